//! The [bytewords](https://github.com/BlockchainCommons/Research/blob/master/papers/bcr-2020-012-bytewords.md)
//! text encoding: one four-letter word per byte, followed by the words of the
//! big-endian CRC32 of the payload.
//!
//! [`Style::Standard`] separates words with spaces, [`Style::Uri`] with dashes,
//! and [`Style::Minimal`] keeps only the first and last letter of each word.
//!
//! ```
//! use ur_transport::bytewords::{decode, encode, Style};
//! let data = b"QR frames";
//! assert_eq!(
//!     encode(data, Style::Standard),
//!     "gray grim crux inky jump huts join inch junk bulb easy onyx data"
//! );
//! assert_eq!(
//!     encode(data, Style::Uri),
//!     "gray-grim-crux-inky-jump-huts-join-inch-junk-bulb-easy-onyx-data"
//! );
//! let minimal = encode(data, Style::Minimal);
//! assert_eq!(minimal, "gygmcxiyjphsjnihjkbbeyoxda");
//! assert_eq!(decode(&minimal, Style::Minimal).unwrap(), data);
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use crate::constants::{MINIMALS, PAIR_INDEXES, WORDS};

/// Fewest bytes a valid encoding can decode to: one payload byte plus the checksum.
const MIN_DECODED_LENGTH: usize = 5;

/// How words are rendered and joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// `able acid also`
    Standard,
    /// `able-acid-also`
    Uri,
    /// `aeadao`
    Minimal,
}

impl Style {
    const fn separator(self) -> &'static str {
        match self {
            Self::Standard => " ",
            Self::Uri => "-",
            Self::Minimal => "",
        }
    }
}

/// Errors that can be returned when decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Input outside ASCII.
    #[error("bytewords string contains non-ASCII characters")]
    NonAscii,
    /// A word doesn't have the length the [`Style`] requires.
    #[error("invalid word length")]
    InvalidLength,
    /// A word contains something other than a lowercase letter.
    #[error("invalid letter")]
    InvalidLetter,
    /// The first and last letters don't identify a word. Usually indicates a
    /// wrong encoding [`Style`] was passed.
    #[error("invalid word")]
    InvalidWord,
    /// The middle letters don't match the word identified by its first and last letters.
    #[error("invalid middle letters of word")]
    InvalidInteriorLetters,
    /// Fewer bytes than a payload byte plus the checksum.
    #[error("decoded data too short")]
    TooShort,
    /// The trailing four bytes aren't the CRC32 of the rest.
    #[error("invalid checksum")]
    InvalidChecksum,
}

/// Recovers the payload from `encoded`, verifying and removing its checksum.
///
/// # Examples
///
/// ```
/// use ur_transport::bytewords::{decode, Style};
/// assert_eq!(
///     decode("able-acid-also-apex-aqua-gray-heat-time-surf", Style::Uri).unwrap(),
///     vec![0, 1, 2, 3, 4]
/// );
/// assert_eq!(
///     decode("aeadaoaxaagyhttesf", Style::Minimal).unwrap(),
///     vec![0, 1, 2, 3, 4]
/// );
/// ```
///
/// # Errors
///
/// Fails on words unknown in `style`, on fewer than five decoded bytes, and
/// on a checksum mismatch.
pub fn decode(encoded: &str, style: Style) -> Result<Vec<u8>, Error> {
    if !encoded.is_ascii() {
        return Err(Error::NonAscii);
    }
    let data = match style {
        Style::Minimal => {
            if encoded.len() % 2 != 0 {
                return Err(Error::InvalidLength);
            }
            encoded
                .as_bytes()
                .chunks(2)
                .map(decode_word)
                .collect::<Result<Vec<_>, _>>()?
        }
        Style::Standard | Style::Uri => encoded
            .split(style.separator())
            .map(|word| {
                if word.len() == 4 {
                    decode_word(word.as_bytes())
                } else {
                    Err(Error::InvalidLength)
                }
            })
            .collect::<Result<Vec<_>, _>>()?,
    };
    strip_checksum(data)
}

/// Looks a two- or four-letter word up by its first and last letter.
fn decode_word(word: &[u8]) -> Result<u8, Error> {
    if !word.iter().all(u8::is_ascii_lowercase) {
        return Err(Error::InvalidLetter);
    }
    let (first, last) = match word {
        [first, last] | [first, _, _, last] => (*first, *last),
        _ => return Err(Error::InvalidLength),
    };
    let pair = [first, last];
    let key = core::str::from_utf8(&pair).map_err(|_| Error::InvalidLetter)?;
    let index = *PAIR_INDEXES.get(key).ok_or(Error::InvalidWord)?;
    if word.len() == 4 && WORDS[usize::from(index)].as_bytes() != word {
        return Err(Error::InvalidInteriorLetters);
    }
    Ok(index)
}

fn strip_checksum(mut data: Vec<u8>) -> Result<Vec<u8>, Error> {
    if data.len() < MIN_DECODED_LENGTH {
        return Err(Error::TooShort);
    }
    let (payload, checksum) = data.split_at(data.len() - 4);
    if crate::checksum(payload).to_be_bytes() != checksum {
        return Err(Error::InvalidChecksum);
    }
    data.truncate(data.len() - 4);
    Ok(data)
}

/// Renders `data` followed by its checksum in `style`.
///
/// # Examples
///
/// ```
/// use ur_transport::bytewords::{encode, Style};
/// assert_eq!(encode(&[0xff], Style::Standard), "zoom zoom able able able");
/// assert_eq!(encode(&[0xff], Style::Minimal), "zmzmaeaeae");
/// ```
#[must_use]
pub fn encode(data: &[u8], style: Style) -> String {
    let checksum = crate::checksum(data).to_be_bytes();
    let table = match style {
        Style::Standard | Style::Uri => &WORDS,
        Style::Minimal => &MINIMALS,
    };
    data.iter()
        .chain(checksum.iter())
        .map(|&b| table[usize::from(b)])
        .collect::<Vec<_>>()
        .join(style.separator())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytewords() {
        let input = vec![0, 1, 2, 128, 255];
        assert_eq!(
            encode(&input, Style::Standard),
            "able acid also lava zoom jade need echo taxi"
        );
        assert_eq!(
            encode(&input, Style::Uri),
            "able-acid-also-lava-zoom-jade-need-echo-taxi"
        );
        assert_eq!(encode(&input, Style::Minimal), "aeadaolazmjendeoti");

        assert_eq!(
            decode(
                "able acid also lava zoom jade need echo taxi",
                Style::Standard
            )
            .unwrap(),
            input
        );
        assert_eq!(
            decode("able-acid-also-lava-zoom-jade-need-echo-taxi", Style::Uri).unwrap(),
            input
        );
        assert_eq!(decode("aeadaolazmjendeoti", Style::Minimal).unwrap(), input);
    }

    #[test]
    fn test_decode_errors() {
        // bad checksum
        assert_eq!(
            decode(
                "able acid also lava zero jade need echo wolf",
                Style::Standard
            )
            .unwrap_err(),
            Error::InvalidChecksum
        );
        assert_eq!(
            decode("able-acid-also-lava-zero-jade-need-echo-wolf", Style::Uri).unwrap_err(),
            Error::InvalidChecksum
        );
        assert_eq!(
            decode("aeadaolazojendeowf", Style::Minimal).unwrap_err(),
            Error::InvalidChecksum
        );

        // a bare checksum carries no payload
        assert_eq!(
            decode(&encode(&[], Style::Minimal), Style::Minimal).unwrap_err(),
            Error::TooShort
        );
        assert_eq!(decode("wolf", Style::Standard).unwrap_err(), Error::TooShort);
        assert_eq!(decode("", Style::Minimal).unwrap_err(), Error::TooShort);

        // word length
        assert_eq!(
            decode("", Style::Standard).unwrap_err(),
            Error::InvalidLength
        );
        assert_eq!(
            decode("able-acid-als-lava-zoom", Style::Uri).unwrap_err(),
            Error::InvalidLength
        );
        assert_eq!(
            decode("aea", Style::Minimal).unwrap_err(),
            Error::InvalidLength
        );
        // wrong separator for the style
        assert_eq!(
            decode("able-acid-also-lava-zoom-jade-need-echo-taxi", Style::Standard).unwrap_err(),
            Error::InvalidLength
        );

        // letters
        assert_eq!(
            decode("ABLE acid also lava zoom", Style::Standard).unwrap_err(),
            Error::InvalidLetter
        );
        assert_eq!(
            decode("ae1d", Style::Minimal).unwrap_err(),
            Error::InvalidLetter
        );

        // unmapped first/last pair
        assert_eq!(
            decode("aeadaolazmjendeoqq", Style::Minimal).unwrap_err(),
            Error::InvalidWord
        );

        // first/last pair of "able" with the middle of "acid"
        assert_eq!(
            decode("acie acid also lava zoom jade need echo taxi", Style::Standard).unwrap_err(),
            Error::InvalidInteriorLetters
        );

        // non ASCII
        assert_eq!(decode("₿", Style::Standard).unwrap_err(), Error::NonAscii);
        assert_eq!(decode("₿", Style::Uri).unwrap_err(), Error::NonAscii);
        assert_eq!(decode("₿", Style::Minimal).unwrap_err(), Error::NonAscii);
    }

    #[test]
    fn test_encoding() {
        let input: [u8; 100] = [
            245, 215, 20, 198, 241, 235, 69, 59, 209, 205, 165, 18, 150, 158, 116, 135, 229, 212,
            19, 159, 17, 37, 239, 240, 253, 11, 109, 191, 37, 242, 38, 120, 223, 41, 156, 189, 242,
            254, 147, 204, 66, 163, 216, 175, 191, 72, 169, 54, 32, 60, 144, 230, 210, 137, 184,
            197, 33, 113, 88, 14, 157, 31, 177, 46, 1, 115, 205, 69, 225, 150, 65, 235, 58, 144,
            65, 240, 133, 69, 113, 247, 63, 53, 242, 165, 160, 144, 26, 13, 79, 237, 133, 71, 82,
            69, 254, 165, 138, 41, 85, 24,
        ];

        let encoded = "yank toys bulb skew when warm free fair tent swan \
                       open brag mint noon jury list view tiny brew note \
                       body data webs what zinc bald join runs data whiz \
                       days keys user diet news ruby whiz zone menu surf \
                       flew omit trip pose runs fund part even crux fern \
                       math visa tied loud redo silk curl jugs hard beta \
                       next cost puma drum acid junk swan free very mint \
                       flap warm fact math flap what limp free jugs yell \
                       fish epic whiz open numb math city belt glow wave \
                       limp fuel grim free zone open love diet gyro cats \
                       fizz holy city puff";

        let encoded_minimal = "yktsbbswwnwmfefrttsnonbgmtnnjyltvwtybwne\
                               bydawswtzcbdjnrsdawzdsksurdtnsrywzzemusf\
                               fwottppersfdptencxfnmhvatdldroskcljshdba\
                               ntctpadmadjksnfevymtfpwmftmhfpwtlpfejsyl\
                               fhecwzonnbmhcybtgwwelpflgmfezeonledtgocs\
                               fzhycypf";

        assert_eq!(decode(encoded, Style::Standard).unwrap(), input.to_vec());
        assert_eq!(
            decode(encoded_minimal, Style::Minimal).unwrap(),
            input.to_vec()
        );
        assert_eq!(encode(&input, Style::Standard), encoded);
        assert_eq!(encode(&input, Style::Minimal), encoded_minimal);
        assert_eq!(
            decode(&encode(&input, Style::Uri), Style::Uri).unwrap(),
            input.to_vec()
        );
    }
}
