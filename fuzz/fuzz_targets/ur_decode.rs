use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &str| {
            ur_transport::decode(data).ok();
            ur_transport::Decoder::default().receive(data).ok();
        });
    }
}
