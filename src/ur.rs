//! Typed payloads rendered as `ur:` URIs.
//!
//! A [`Ur`] pairs a type tag with CBOR bytes. The [`Encoder`] hands those
//! bytes to a fountain encoder and renders every part as a URI: the part is
//! serialized to CBOR, then encoded as bytewords. The [`Decoder`] reverses
//! this, one URI at a time.
//!
//! A payload that fits into one fragment is emitted as `ur:<type>/<body>`;
//! longer ones as `ur:<type>/<sequence>-<count>/<body>`.
//!
//! ```
//! let data = String::from("Ten chars!").repeat(10);
//! let mut encoder = ur_transport::Encoder::bytes(data.as_bytes(), 5).unwrap();
//! let mut decoder = ur_transport::Decoder::default();
//! while !decoder.complete() {
//!     assert_eq!(decoder.message(), None);
//!     decoder.receive(&encoder.next_part().unwrap()).unwrap();
//! }
//! let ur = decoder.ur().unwrap();
//! assert_eq!(ur.ur_type(), "bytes");
//! assert_eq!(ur.decode_cbor().unwrap(), data.as_bytes());
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::bytewords::{self, Style};
use crate::fountain::{self, Config, Part};

const SCHEME: &str = "ur";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Bytewords(#[from] bytewords::Error),
    #[error(transparent)]
    Fountain(#[from] fountain::Error),
    #[error("invalid UR type")]
    InvalidType,
    #[error("invalid scheme")]
    InvalidScheme,
    #[error("invalid path")]
    InvalidPath,
    #[error("invalid sequence indices")]
    InvalidIndices,
    #[error("UR type differs from previously received parts")]
    TypeMismatch,
    #[error("CBOR: {0}")]
    Cbor(String),
}

/// Whether `ur_type` matches `[a-z0-9-]+`.
#[must_use]
pub fn is_ur_type(ur_type: &str) -> bool {
    !ur_type.is_empty()
        && ur_type
            .bytes()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'-')
}

/// A typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ur {
    ur_type: String,
    payload: Vec<u8>,
}

impl Ur {
    /// # Errors
    ///
    /// Fails with [`Error::InvalidType`] unless `ur_type` matches `[a-z0-9-]+`.
    pub fn new(ur_type: &str, payload: Vec<u8>) -> Result<Self, Error> {
        if !is_ur_type(ur_type) {
            return Err(Error::InvalidType);
        }
        Ok(Self {
            ur_type: ur_type.to_string(),
            payload,
        })
    }

    /// Wraps raw bytes as a CBOR byte string of type `bytes`.
    ///
    /// # Errors
    ///
    /// Only if the CBOR encoder fails.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let mut encoder = minicbor::Encoder::new(Vec::new());
        encoder
            .bytes(data)
            .map_err(|e| Error::Cbor(e.to_string()))?;
        Self::new("bytes", encoder.into_writer())
    }

    #[must_use]
    pub fn ur_type(&self) -> &str {
        &self.ur_type
    }

    /// The CBOR payload.
    #[must_use]
    pub fn cbor(&self) -> &[u8] {
        &self.payload
    }

    /// Unwraps a payload built by [`Ur::from_bytes`].
    ///
    /// # Errors
    ///
    /// Fails if the payload isn't a single CBOR byte string.
    pub fn decode_cbor(&self) -> Result<Vec<u8>, Error> {
        let mut decoder = minicbor::Decoder::new(&self.payload);
        let bytes = decoder
            .bytes()
            .map_err(|e| Error::Cbor(e.to_string()))?
            .to_vec();
        if decoder.position() != self.payload.len() {
            return Err(Error::Cbor("trailing data after byte string".into()));
        }
        Ok(bytes)
    }
}

fn encode_uri(scheme: &str, items: &[&str]) -> String {
    alloc::format!("{}:{}", scheme, items.join("/"))
}

fn encode_ur(items: &[&str]) -> String {
    encode_uri(SCHEME, items)
}

/// Encodes `ur` as a single-part URI, however long its payload.
///
/// # Examples
///
/// ```
/// let ur = ur_transport::Ur::from_bytes(b"Hello").unwrap();
/// assert_eq!(
///     ur_transport::encode(&ur),
///     "ur:bytes/free-fund-inch-jazz-jazz-jowl-user-onyx-foxy-vial"
/// );
/// ```
#[must_use]
pub fn encode(ur: &Ur) -> String {
    let body = bytewords::encode(&ur.payload, Style::Uri);
    encode_ur(&[&ur.ur_type, &body])
}

/// Whether a URI carries a whole payload or one fountain part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    SinglePart,
    MultiPart,
}

struct Parsed {
    ur_type: String,
    indices: Option<(u32, u32)>,
    body: Vec<u8>,
}

fn parse(value: &str) -> Result<Parsed, Error> {
    // QR alphanumeric mode upper-cases everything
    let value = value.to_ascii_lowercase();
    let path = value
        .strip_prefix(SCHEME)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or(Error::InvalidScheme)?;
    let segments: Vec<&str> = path.split('/').collect();
    let (ur_type, indices, body) = match segments[..] {
        [ur_type, body] => (ur_type, None, body),
        [ur_type, indices, body] => (ur_type, Some(parse_indices(indices)?), body),
        _ => return Err(Error::InvalidPath),
    };
    if !is_ur_type(ur_type) {
        return Err(Error::InvalidType);
    }
    let style = if body.contains('-') {
        Style::Uri
    } else {
        Style::Minimal
    };
    Ok(Parsed {
        ur_type: ur_type.to_string(),
        indices,
        body: bytewords::decode(body, style)?,
    })
}

fn parse_indices(indices: &str) -> Result<(u32, u32), Error> {
    let (sequence, count) = indices.split_once('-').ok_or(Error::InvalidIndices)?;
    let sequence = sequence.parse().map_err(|_| Error::InvalidIndices)?;
    let count = count.parse().map_err(|_| Error::InvalidIndices)?;
    Ok((sequence, count))
}

/// Decodes a single URI into its kind and body: the payload of a
/// single-part UR, or the CBOR of a fountain part.
///
/// # Examples
///
/// ```
/// use ur_transport::ur::{decode, Kind};
/// let (kind, cbor) = decode("ur:bytes/free-fund-inch-jazz-jazz-jowl-user-onyx-foxy-vial").unwrap();
/// assert_eq!(kind, Kind::SinglePart);
/// assert_eq!(cbor, b"\x45Hello");
/// ```
///
/// # Errors
///
/// Fails on a malformed URI or body.
pub fn decode(value: &str) -> Result<(Kind, Vec<u8>), Error> {
    let parsed = parse(value)?;
    let kind = match parsed.indices {
        None => Kind::SinglePart,
        Some(_) => Kind::MultiPart,
    };
    Ok((kind, parsed.body))
}

/// Emits the URIs for one [`Ur`]. Callers must serialize access to one
/// instance.
#[derive(Debug)]
pub struct Encoder {
    ur: Ur,
    fountain: fountain::Encoder,
}

impl Encoder {
    /// # Errors
    ///
    /// Fails if the payload is empty or `config` doesn't validate.
    pub fn new(ur: Ur, config: Config) -> Result<Self, Error> {
        let fountain = fountain::Encoder::new(&ur.payload, config)?;
        Ok(Self { ur, fountain })
    }

    /// Encodes raw bytes as type `bytes` with the given maximum fragment length.
    ///
    /// # Errors
    ///
    /// Fails if `data` is empty or `max_fragment_length` is zero.
    pub fn bytes(data: &[u8], max_fragment_length: usize) -> Result<Self, Error> {
        Self::new(Ur::from_bytes(data)?, Config::new(max_fragment_length))
    }

    /// The next URI. A single-fragment payload yields the same single-part
    /// URI on every call without advancing the sequence.
    ///
    /// # Errors
    ///
    /// Only if serializing the fountain part fails.
    pub fn next_part(&mut self) -> Result<String, Error> {
        if self.fountain.is_single_part() {
            return Ok(encode(&self.ur));
        }
        let part = self.fountain.next_part()?;
        let body = bytewords::encode(&part.cbor()?, Style::Uri);
        Ok(encode_ur(&[&self.ur.ur_type, &part.sequence_id(), &body]))
    }

    /// One part per fragment: a full pass with no redundancy.
    ///
    /// # Errors
    ///
    /// See [`Encoder::next_part`].
    pub fn encode_whole(&mut self) -> Result<Vec<String>, Error> {
        (0..self.fragment_count()).map(|_| self.next_part()).collect()
    }

    #[must_use]
    pub const fn current_sequence(&self) -> u32 {
        self.fountain.current_sequence()
    }

    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fountain.fragment_count()
    }

    #[must_use]
    pub fn fragments(&self) -> &[Vec<u8>] {
        self.fountain.fragments()
    }

    #[must_use]
    pub fn message_length(&self) -> usize {
        self.fountain.message_length()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fountain.is_complete()
    }

    #[must_use]
    pub fn is_single_part(&self) -> bool {
        self.fountain.is_single_part()
    }

    #[must_use]
    pub fn ur(&self) -> &Ur {
        &self.ur
    }
}

/// Collects URIs of one [`Ur`] until its payload is restored.
#[derive(Debug, Default)]
pub struct Decoder {
    ur_type: Option<String>,
    single: Option<Vec<u8>>,
    fountain: fountain::Decoder,
}

impl Decoder {
    /// Rejects multi-part URs announcing more than `max_fragment_count`
    /// fragments. Defaults to [`fountain::DEFAULT_MAX_FRAGMENT_COUNT`].
    #[must_use]
    pub fn with_max_fragment_count(mut self, max_fragment_count: usize) -> Self {
        self.fountain = self.fountain.with_max_fragment_count(max_fragment_count);
        self
    }

    /// Feeds one URI, single- or multi-part.
    ///
    /// # Errors
    ///
    /// Fails on a malformed URI, a type other than the session's, or a
    /// fountain part that doesn't fit the parts received so far.
    pub fn receive(&mut self, value: &str) -> Result<(), Error> {
        if self.complete() {
            return Ok(());
        }
        let parsed = parse(value)?;
        if self
            .ur_type
            .as_ref()
            .is_some_and(|ur_type| *ur_type != parsed.ur_type)
        {
            return Err(Error::TypeMismatch);
        }
        match parsed.indices {
            None => self.single = Some(parsed.body),
            Some((sequence, count)) => {
                let part = Part::from_cbor(&parsed.body)?;
                if part.sequence() != sequence || part.sequence_count() != count {
                    return Err(Error::InvalidIndices);
                }
                self.fountain.receive(&part)?;
            }
        }
        if self.ur_type.is_none() {
            tracing::debug!(ur_type = %parsed.ur_type, "UR decoding started");
            self.ur_type = Some(parsed.ur_type);
        }
        if self.complete() {
            tracing::debug!("UR decoding complete");
        }
        Ok(())
    }

    #[must_use]
    pub fn complete(&self) -> bool {
        self.single.is_some() || self.fountain.complete()
    }

    /// The restored CBOR payload.
    #[must_use]
    pub fn message(&self) -> Option<&[u8]> {
        self.single.as_deref().or_else(|| self.fountain.message())
    }

    #[must_use]
    pub fn ur_type(&self) -> Option<&str> {
        self.ur_type.as_deref()
    }

    /// The restored [`Ur`], once complete.
    #[must_use]
    pub fn ur(&self) -> Option<Ur> {
        Some(Ur {
            ur_type: self.ur_type.clone()?,
            payload: self.message()?.to_vec(),
        })
    }

    /// Fraction of the payload recovered so far, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.single.is_some() {
            1.0
        } else {
            self.fountain.progress()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xoshiro::test_utils::make_message;

    fn make_message_ur(length: usize, seed: &str) -> Ur {
        Ur::from_bytes(&make_message(seed, length)).unwrap()
    }

    #[test]
    fn test_ur_type() {
        assert!(is_ur_type("bytes"));
        assert!(is_ur_type("crypto-hdkey"));
        assert!(is_ur_type("eth-sign-request"));
        assert!(is_ur_type("x509"));
        assert!(!is_ur_type(""));
        assert!(!is_ur_type("Bytes"));
        assert!(!is_ur_type("by_tes"));
        assert!(!is_ur_type("by tes"));
        assert_eq!(Ur::new("Bytes", vec![0]).unwrap_err(), Error::InvalidType);
    }

    #[test]
    fn test_from_bytes() {
        let ur = Ur::from_bytes(b"Hello").unwrap();
        assert_eq!(ur.ur_type(), "bytes");
        assert_eq!(ur.cbor(), b"\x45Hello");
        assert_eq!(ur.decode_cbor().unwrap(), b"Hello");
        let long = make_message_ur(256, "Wolf");
        assert_eq!(&long.cbor()[..3], &[0x59, 0x01, 0x00]);

        let not_bytes = Ur::new("bytes", vec![0x01]).unwrap();
        assert!(matches!(not_bytes.decode_cbor(), Err(Error::Cbor(_))));
        let trailing = Ur::new("bytes", vec![0x41, 0x00, 0x00]).unwrap();
        assert!(matches!(trailing.decode_cbor(), Err(Error::Cbor(_))));
    }

    #[test]
    fn test_single_part_ur() {
        let ur = make_message_ur(50, "Wolf");
        let encoded = encode(&ur);
        let expected = "ur:bytes/hard-easy-maze-jolt-skew-high-yell-kite-poem-yank-high-toys-yurt-swan-obey-obey-apex-able-days-unit-tiny-drum-math-help-kept-poem-scar-jolt-glow-drop-fern-stub-onyx-glow-lamb-aqua-whiz-urge-foxy-work-drop-liar-scar-jury-numb-very-gala-brew-jowl-data-puff-cats-draw-knob-rock-cash";
        assert_eq!(encoded, expected);
        assert_eq!(decode(&encoded).unwrap(), (Kind::SinglePart, ur.cbor().to_vec()));

        // minimal bodies decode to the same payload
        let minimal = "ur:bytes/hdeymejtswhhylkepmykhhtsytsnoyoyaxaedsuttydmmhhpktpmsrjtgwdpfnsboxgwlbaawzuefywkdplrsrjynbvygabwjldapfcsdwkbrkch";
        assert_eq!(decode(minimal).unwrap(), (Kind::SinglePart, ur.cbor().to_vec()));
    }

    #[test]
    fn test_single_part_encoder_is_stable() {
        let ur = make_message_ur(50, "Wolf");
        let mut encoder = Encoder::new(ur.clone(), Config::new(1000)).unwrap();
        assert!(encoder.is_single_part());
        assert_eq!(encoder.fragment_count(), 1);
        let first = encoder.next_part().unwrap();
        for _ in 0..3 {
            assert_eq!(encoder.next_part().unwrap(), first);
        }
        assert_eq!(first, encode(&ur));
        assert_eq!(encoder.current_sequence(), 0);
        assert_eq!(encoder.encode_whole().unwrap(), vec![first]);
    }

    #[test]
    fn test_ur_encoder() {
        let ur = make_message_ur(256, "Wolf");
        let mut encoder = Encoder::new(ur, Config::new(30)).unwrap();
        assert_eq!(encoder.fragment_count(), 9);
        assert_eq!(encoder.message_length(), 259);
        let expected = vec![
            "ur:bytes/1-9/limp-acid-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-hawk-acid-able-maze-jolt-skew-high-yell-kite-poem-yank-high-toys-yurt-swan-obey-obey-apex-able-days-unit-tiny-drum-math-help-kept-poem-scar-jolt-dark-gems-limp-gush",
            "ur:bytes/2-9/limp-also-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-glow-drop-fern-stub-onyx-glow-lamb-aqua-whiz-urge-foxy-work-drop-liar-scar-jury-numb-very-gala-brew-jowl-data-puff-cats-grim-gush-hawk-huts-toil-road-crux-able-fizz",
            "ur:bytes/3-9/limp-apex-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-hope-lamb-kiln-luck-urge-join-beta-drum-sets-fish-fair-drop-stub-idle-game-cusp-axis-vows-solo-vial-game-yank-sets-jury-kick-liar-open-vows-junk-solo-paid-zoom-oval",
            "ur:bytes/4-9/limp-aqua-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-solo-task-hope-mint-holy-data-waxy-diet-apex-note-user-luck-owls-glow-code-keno-note-rust-knob-real-warm-pool-sets-jolt-atom-mild-pool-oval-stub-road-zinc-rust-axis",
            "ur:bytes/5-9/limp-arch-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-tomb-bald-film-sets-rock-zoom-claw-note-zone-love-noon-jump-fizz-brag-menu-kept-rich-time-jugs-cook-time-lung-flap-dull-rock-foxy-flew-data-jowl-dice-judo-knob-wolf",
            "ur:bytes/6-9/limp-atom-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-cook-jowl-hawk-holy-bias-silk-lamb-wave-free-cost-puff-numb-blue-cost-real-jade-cost-puma-very-redo-luck-zinc-zinc-peck-meow-iced-meow-onyx-kiwi-lung-hard-solo-wasp",
            "ur:bytes/7-9/limp-aunt-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-vows-zoom-when-junk-what-curl-rust-visa-yawn-help-arch-rust-onyx-meow-view-aunt-maze-deli-back-able-good-owls-fact-visa-need-into-data-good-heat-heat-real-noon-holy",
            "ur:bytes/8-9/limp-away-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-drum-soap-open-kick-bulb-hang-solo-list-join-time-game-poem-tent-memo-open-fact-numb-undo-inky-race-half-rust-saga-buzz-slot-taco-redo-dark-luau-bulb-ugly-able-task",
            "ur:bytes/9-9/limp-axis-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-jugs-kite-cusp-mild-cook-inch-duty-help-half-omit-judo-jolt-film-lion-warm-acid-soap-apex-rock-yurt-buzz-trip-beta-undo-tomb-gift-gift-able-able-vast-gala-vast-navy",
            "ur:bytes/10-9/limp-back-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-hawk-acid-able-maze-jolt-skew-high-yell-kite-poem-yank-high-toys-yurt-swan-obey-obey-apex-able-days-unit-tiny-drum-math-help-kept-poem-scar-jolt-wand-kiwi-pool-zaps",
            "ur:bytes/11-9/limp-bald-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-hope-lamb-kiln-luck-urge-join-beta-drum-sets-fish-fair-drop-stub-idle-game-cusp-axis-vows-solo-vial-game-yank-sets-jury-kick-liar-open-vows-junk-vibe-taxi-idea-peck",
            "ur:bytes/12-9/limp-barn-axis-chef-acid-apex-city-wave-numb-pool-junk-hard-cola-real-lava-luau-zoom-drum-gems-taco-soap-easy-idle-film-wave-jowl-what-pose-data-monk-task-scar-vial-city-grim-zone-memo-veto-vial-lava-redo-diet-mint-barn-part-runs",
        ];
        for e in expected {
            assert_eq!(encoder.next_part().unwrap(), e);
        }
    }

    #[test]
    fn test_encode_whole() {
        let ur = make_message_ur(256, "Wolf");
        let mut encoder = Encoder::new(ur, Config::new(30)).unwrap();
        let parts = encoder.encode_whole().unwrap();
        assert_eq!(parts.len(), 9);
        for (sequence, part) in (1..).zip(&parts) {
            assert!(part.starts_with(&format!("ur:bytes/{sequence}-9/")));
        }
        assert!(encoder.is_complete());

        let mut decoder = Decoder::default();
        for part in &parts {
            decoder.receive(part).unwrap();
        }
        assert!(decoder.complete());
        assert_eq!(decoder.ur().unwrap(), *encoder.ur());
    }

    #[test]
    fn test_encoder_errors() {
        let empty = Ur::new("bytes", vec![]).unwrap();
        assert_eq!(
            Encoder::new(empty, Config::default()).unwrap_err(),
            Error::Fountain(fountain::Error::EmptyMessage)
        );
        assert!(matches!(
            Encoder::bytes(b"foo", 0).unwrap_err(),
            Error::Fountain(fountain::Error::InvalidFragmentLength { .. })
        ));
    }

    #[test]
    fn test_multipart_ur() {
        let ur = make_message_ur(32767, "Wolf");
        let mut encoder = Encoder::new(ur.clone(), Config::new(1000)).unwrap();
        let mut decoder = Decoder::default();
        while !decoder.complete() {
            assert_eq!(decoder.message(), None);
            assert_eq!(decoder.ur(), None);
            let part = encoder.next_part().unwrap();
            decoder.receive(&part).unwrap();
        }
        assert_eq!(decoder.ur_type(), Some("bytes"));
        assert_eq!(decoder.message(), Some(ur.cbor()));
        assert_eq!(decoder.ur().unwrap(), ur);
    }

    #[test]
    fn test_decoder_accepts_minimal_and_uppercase() {
        let ur = make_message_ur(256, "Wolf");
        let mut encoder = Encoder::new(ur.clone(), Config::new(30)).unwrap();
        let mut decoder = Decoder::default();
        decoder
            .receive("ur:bytes/1-9/lpadascfadaxcywenbpljkhdcahkadaemejtswhhylkepmykhhtsytsnoyoyaxaedsuttydmmhhpktpmsrjtdkgslpgh")
            .unwrap();
        encoder.next_part().unwrap();
        while !decoder.complete() {
            let part = encoder.next_part().unwrap().to_uppercase();
            decoder.receive(&part).unwrap();
        }
        assert_eq!(decoder.ur().unwrap(), ur);
        assert!((decoder.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decoder_errors() {
        let mut encoder = Encoder::new(make_message_ur(256, "Wolf"), Config::new(30)).unwrap();
        let first = encoder.next_part().unwrap();
        let body = first.rsplit('/').next().unwrap();

        let mut decoder = Decoder::default();
        assert_eq!(
            decoder.receive(&format!("uhr:bytes/1-9/{body}")).unwrap_err(),
            Error::InvalidScheme
        );
        assert_eq!(
            decoder.receive(&format!("ur:by_tes/1-9/{body}")).unwrap_err(),
            Error::InvalidType
        );
        assert_eq!(
            decoder.receive(&format!("ur:bytes/{body}/1-9/extra")).unwrap_err(),
            Error::InvalidPath
        );
        assert_eq!(decoder.receive("ur:bytes").unwrap_err(), Error::InvalidPath);
        assert_eq!(
            decoder.receive(&format!("ur:bytes/1-x/{body}")).unwrap_err(),
            Error::InvalidIndices
        );
        assert_eq!(
            decoder.receive(&format!("ur:bytes/19/{body}")).unwrap_err(),
            Error::InvalidIndices
        );
        assert_eq!(
            decoder.receive(&format!("ur:bytes/2-9/{body}")).unwrap_err(),
            Error::InvalidIndices
        );
        assert_eq!(
            decoder.receive("ur:bytes/1-9/able-acid").unwrap_err(),
            Error::Bytewords(bytewords::Error::TooShort)
        );
        assert_eq!(decoder.ur_type(), None);

        decoder.receive(&first).unwrap();
        assert_eq!(decoder.ur_type(), Some("bytes"));
        let retyped = first.replacen("ur:bytes/", "ur:crypto-psbt/", 1);
        assert_eq!(decoder.receive(&retyped).unwrap_err(), Error::TypeMismatch);

        let other = Encoder::new(make_message_ur(256, "Other"), Config::new(30))
            .unwrap()
            .next_part()
            .unwrap();
        assert_eq!(
            decoder.receive(&other).unwrap_err(),
            Error::Fountain(fountain::Error::InconsistentPart)
        );
        assert!(!decoder.complete());
    }

    #[test]
    fn test_decoder_bounds_fragment_count() {
        let oversized = "ur:bytes/80001-80000/lpcyaeadetlycyaeadetlacyaeadetlaaefpaebeihwsla";
        let mut decoder = Decoder::default();
        assert_eq!(
            decoder.receive(oversized).unwrap_err(),
            Error::Fountain(fountain::Error::InvalidPart)
        );
        assert_eq!(decoder.ur_type(), None);

        let mut encoder = Encoder::new(make_message_ur(256, "Wolf"), Config::new(30)).unwrap();
        let mut decoder = Decoder::default().with_max_fragment_count(8);
        assert_eq!(
            decoder.receive(&encoder.next_part().unwrap()).unwrap_err(),
            Error::Fountain(fountain::Error::InvalidPart)
        );
    }

    #[test]
    fn test_decode() {
        let mut encoder = Encoder::new(make_message_ur(256, "Wolf"), Config::new(30)).unwrap();
        let (kind, cbor) = decode(&encoder.next_part().unwrap()).unwrap();
        assert_eq!(kind, Kind::MultiPart);
        let part = Part::from_cbor(&cbor).unwrap();
        assert_eq!(part.sequence_id(), "1-9");
        assert_eq!(part.message_length(), 259);
    }
}
