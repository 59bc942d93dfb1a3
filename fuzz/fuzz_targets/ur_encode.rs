use honggfuzz::fuzz;

use ur_transport::{Decoder, Encoder};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Some(&first) = data.first() else {
                return;
            };
            let mut encoder = Encoder::bytes(data, 1 + first as usize).unwrap();
            let mut decoder = Decoder::default();
            for part in encoder.encode_whole().unwrap() {
                decoder.receive(&part).unwrap();
            }
            assert_eq!(decoder.ur().unwrap().decode_cbor().unwrap(), data);
        });
    }
}
