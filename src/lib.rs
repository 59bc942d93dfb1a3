//! `ur_transport` turns binary payloads into "Uniform Resource" strings and back.
//! The text stays within a small case-insensitive alphabet, so it travels well
//! in URIs and alphanumeric QR codes.
//!
//! # Bytewords
//! ```
//! use ur_transport::bytewords::{encode, Style};
//! let encoded = encode("Some binary data".as_bytes(), Style::Minimal);
//! assert_eq!(encoded, "gujljnihcxidinjthsjpkkcxiehsjyhsnsgdmkht");
//! ```
//!
//! # Multi-part URs
//!
//! Parts render their body with the `uri` bytewords style.
//! ```
//! let data = String::from("Some binary data").repeat(100);
//! let mut encoder = ur_transport::Encoder::bytes(data.as_bytes(), 10).unwrap();
//! assert_eq!(encoder.fragment_count(), 161);
//! let part = encoder.next_part().unwrap();
//! assert_eq!(
//!     part,
//!     "ur:bytes/1-161/limp-acid-cats-obey-chef-atom-flux-city-judo-yell-quiz-trip-\
//!      game-hawk-atom-fizz-guru-jowl-join-inch-crux-iced-iron-maze-obey-hope-horn"
//! );
//! ```
//!
//! # Lossy transport
//!
//! An animated QR code loops over an endless part stream. A scanner may join
//! late and drop frames; it completes once it holds enough distinct parts.
//! ```
//! use ur_transport::{Decoder, Encoder};
//! let data = String::from("Some binary data").repeat(100);
//! let mut encoder = Encoder::bytes(data.as_bytes(), 10).unwrap();
//! let mut decoder = Decoder::default();
//! while !decoder.complete() {
//!     let part = encoder.next_part().unwrap();
//!     // drop every other frame
//!     if encoder.current_sequence() & 1 > 0 {
//!         decoder.receive(&part).unwrap();
//!     }
//! }
//! let ur = decoder.ur().unwrap();
//! assert_eq!(ur.decode_cbor().unwrap(), data.as_bytes());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bytewords;
pub mod constants;
pub mod fountain;
pub mod sampler;
pub mod ur;
pub mod xoshiro;

pub use self::fountain::Config;
pub use self::ur::{decode, encode, Decoder, Encoder, Ur};

const CRC32: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

/// CRC32 (IEEE 802.3, reflected) of `data`, as used by both the bytewords
/// trailer and the fountain message checksum.
///
/// ```
/// assert_eq!(ur_transport::checksum(b""), 0);
/// assert_eq!(ur_transport::checksum(b"Wolf"), 0x598c_84dc);
/// ```
#[must_use]
pub fn checksum(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}
