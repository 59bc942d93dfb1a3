//! Cycles the first command line argument through an animated terminal QR code.

use qrcode::QrCode;
use tracing_subscriber::EnvFilter;

use std::io::Write;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let message = std::env::args().nth(1).unwrap_or_else(|| "Hello, world!".into());
    let mut encoder = ur_transport::Encoder::bytes(message.as_bytes(), 5).unwrap();
    let mut stdout = std::io::stdout();
    loop {
        let ur = encoder.next_part().unwrap();
        // upper case fits the denser alphanumeric QR mode
        let code = QrCode::new(ur.to_uppercase()).unwrap();
        let string = code
            .render::<char>()
            .quiet_zone(false)
            .module_dimensions(2, 1)
            .build();
        writeln!(stdout, "{string}\n{ur}\n\n\n").unwrap();
        stdout.flush().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1000));
    }
}
