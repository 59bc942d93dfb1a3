use honggfuzz::fuzz;

use ur_transport::bytewords::{decode, Style};

fn main() {
    loop {
        fuzz!(|data: &str| {
            for style in [Style::Minimal, Style::Standard, Style::Uri] {
                if let Ok(decoded) = decode(data, style) {
                    assert!(!decoded.is_empty());
                }
            }
        });
    }
}
