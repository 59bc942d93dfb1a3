use honggfuzz::fuzz;

use ur_transport::fountain::{Decoder, Part};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(part) = Part::from_cbor(data) {
                assert_eq!(Part::from_cbor(&part.cbor().unwrap()).unwrap(), part);
                Decoder::default().receive(&part).ok();
            }
        });
    }
}
