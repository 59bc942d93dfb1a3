use honggfuzz::fuzz;

use ur_transport::bytewords::{decode, encode, Style};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.is_empty() {
                return;
            }
            for style in [Style::Standard, Style::Uri, Style::Minimal] {
                let encoded = encode(data, style);
                assert_eq!(decode(&encoded, style).unwrap(), data);
            }
        });
    }
}
