//! Rateless splitting of a message into equally sized parts.
//!
//! An [`Encoder`] cuts the message into fragments and emits an unbounded
//! stream of [`Part`]s, each carrying either one fragment or the xor of
//! several. A [`Decoder`] collects any sufficiently large subset of that
//! stream, in any order, and peels the message back out.
//!
//! The first `fragment_count` parts carry every segment unmixed, in order. Every later
//! part mixes a pseudo-random selection that depends only on its sequence number and
//! the message checksum, so a decoder can recompute the selection independently.
//!
//! ```
//! use ur_transport::fountain::{Config, Decoder, Encoder};
//! let data = String::from("Ten chars!").repeat(10);
//! let config = Config::new(15);
//! let mut encoder = Encoder::new(data.as_bytes(), config).unwrap();
//! let mut decoder = Decoder::default();
//! while !decoder.complete() {
//!     assert_eq!(decoder.message(), None);
//!     let part = encoder.next_part().unwrap();
//!     decoder.receive(&part).unwrap();
//! }
//! assert_eq!(decoder.message(), Some(data.as_bytes()));
//! ```

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

pub const DEFAULT_MAX_FRAGMENT_LENGTH: usize = 100;
pub const DEFAULT_MIN_FRAGMENT_LENGTH: usize = 10;
/// Largest fragment count a [`Decoder`] accepts unless configured otherwise.
pub const DEFAULT_MAX_FRAGMENT_COUNT: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected non-empty message")]
    EmptyMessage,
    #[error("message longer than 2^32 - 1 bytes")]
    MessageTooLong,
    #[error("invalid fragment length bounds: minimum {min}, maximum {max}")]
    InvalidFragmentLength { min: usize, max: usize },
    #[error("part carries zero counters, no data, or too many fragments")]
    InvalidPart,
    #[error("part is inconsistent with previously received parts")]
    InconsistentPart,
    #[error("reassembled message doesn't match its checksum")]
    InvalidChecksum,
    #[error(transparent)]
    Sampler(#[from] crate::sampler::Error),
    #[error("CBOR: {0}")]
    Cbor(String),
}

/// Fragmentation parameters of an encoding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on the fragment length.
    pub max_fragment_length: usize,
    /// Lower bound the maximum must respect.
    pub min_fragment_length: usize,
    /// Sequence number preceding the first emitted part.
    pub first_sequence: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_fragment_length: DEFAULT_MAX_FRAGMENT_LENGTH,
            min_fragment_length: DEFAULT_MIN_FRAGMENT_LENGTH,
            first_sequence: 0,
        }
    }
}

impl Config {
    /// Default parameters with the given maximum. The minimum is lowered to
    /// `max_fragment_length` when that is below the default minimum.
    #[must_use]
    pub fn new(max_fragment_length: usize) -> Self {
        Self {
            max_fragment_length,
            min_fragment_length: DEFAULT_MIN_FRAGMENT_LENGTH.min(max_fragment_length),
            first_sequence: 0,
        }
    }

    #[must_use]
    pub fn with_max_fragment_length(mut self, max_fragment_length: usize) -> Self {
        self.max_fragment_length = max_fragment_length;
        self
    }

    #[must_use]
    pub fn with_min_fragment_length(mut self, min_fragment_length: usize) -> Self {
        self.min_fragment_length = min_fragment_length;
        self
    }

    #[must_use]
    pub fn with_first_sequence(mut self, first_sequence: u32) -> Self {
        self.first_sequence = first_sequence;
        self
    }

    /// # Errors
    ///
    /// Fails if the minimum is zero or exceeds the maximum.
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_fragment_length == 0 || self.max_fragment_length < self.min_fragment_length {
            return Err(Error::InvalidFragmentLength {
                min: self.min_fragment_length,
                max: self.max_fragment_length,
            });
        }
        Ok(())
    }
}

/// The common length of the fragments `data_length` bytes are split into:
/// the fewest fragments no longer than `max_fragment_length`, balanced.
///
/// `max_fragment_length` must be non-zero.
#[must_use]
pub fn fragment_length(data_length: usize, max_fragment_length: usize) -> usize {
    let fragment_count = data_length.div_ceil(max_fragment_length).max(1);
    data_length.div_ceil(fragment_count)
}

/// Splits `data` into fragments of `fragment_length`, zero-padding the last one.
#[must_use]
pub fn partition(data: &[u8], fragment_length: usize) -> Vec<Vec<u8>> {
    data.chunks(fragment_length)
        .map(|chunk| {
            let mut fragment = chunk.to_vec();
            fragment.resize(fragment_length, 0);
            fragment
        })
        .collect()
}

fn join(fragments: impl IntoIterator<Item = Vec<u8>>, message_length: usize) -> Vec<u8> {
    let mut joined: Vec<u8> = fragments.into_iter().flatten().collect();
    joined.truncate(message_length);
    joined
}

/// Indexes of the fragments mixed into part `sequence`.
///
/// Sequence numbers up to `fragment_count` select their own fragment alone.
/// Beyond that, a generator seeded with the big-endian `sequence` and
/// `checksum` picks a degree and then that many distinct fragments.
///
/// # Errors
///
/// Fails if `fragment_count` is zero.
pub fn choose_fragments(
    sequence: u32,
    fragment_count: usize,
    checksum: u32,
) -> Result<Vec<usize>, Error> {
    if fragment_count == 0 {
        return Err(crate::sampler::Error::Empty.into());
    }
    if sequence as usize <= fragment_count {
        return Ok(alloc::vec![(sequence as usize).saturating_sub(1)]);
    }
    let mut seed = [0_u8; 8];
    seed[..4].copy_from_slice(&sequence.to_be_bytes());
    seed[4..].copy_from_slice(&checksum.to_be_bytes());
    let mut xoshiro = crate::xoshiro::Xoshiro256::from(&seed[..]);
    let degree = xoshiro.choose_degree(fragment_count)?;
    let mut shuffled = xoshiro.shuffled((0..fragment_count).collect());
    shuffled.truncate(degree);
    Ok(shuffled)
}

fn xor_into(target: &mut [u8], source: &[u8]) {
    for (t, s) in target.iter_mut().zip(source) {
        *t ^= s;
    }
}

/// One emitted piece of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    sequence: u32,
    sequence_count: u32,
    message_length: u32,
    checksum: u32,
    data: Vec<u8>,
}

impl Part {
    #[must_use]
    pub fn new(
        sequence: u32,
        sequence_count: u32,
        message_length: u32,
        checksum: u32,
        data: Vec<u8>,
    ) -> Self {
        Self {
            sequence,
            sequence_count,
            message_length,
            checksum,
            data,
        }
    }

    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    #[must_use]
    pub const fn sequence_count(&self) -> u32 {
        self.sequence_count
    }

    #[must_use]
    pub const fn message_length(&self) -> u32 {
        self.message_length
    }

    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The `<sequence>-<count>` path segment of a multi-part UR.
    #[must_use]
    pub fn sequence_id(&self) -> String {
        alloc::format!("{}-{}", self.sequence, self.sequence_count)
    }

    /// The sorted fragment indexes this part mixes.
    ///
    /// # Errors
    ///
    /// Fails if the part claims zero fragments.
    pub fn indexes(&self) -> Result<Vec<usize>, Error> {
        let mut indexes =
            choose_fragments(self.sequence, self.sequence_count as usize, self.checksum)?;
        indexes.sort_unstable();
        Ok(indexes)
    }

    /// Serializes the part as the CBOR array
    /// `[sequence, sequence_count, message_length, checksum, data]`.
    ///
    /// # Errors
    ///
    /// Only if the CBOR encoder fails.
    pub fn cbor(&self) -> Result<Vec<u8>, Error> {
        let mut encoder = minicbor::Encoder::new(Vec::new());
        encoder
            .encode(self)
            .map_err(|e| Error::Cbor(e.to_string()))?;
        Ok(encoder.into_writer())
    }

    /// # Errors
    ///
    /// Fails unless `cbor` is a five-element array of four `u32`s and a byte string.
    pub fn from_cbor(cbor: &[u8]) -> Result<Self, Error> {
        minicbor::decode(cbor).map_err(|e| Error::Cbor(e.to_string()))
    }
}

impl<C> minicbor::Encode<C> for Part {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(5)?
            .u32(self.sequence)?
            .u32(self.sequence_count)?
            .u32(self.message_length)?
            .u32(self.checksum)?
            .bytes(&self.data)?;
        Ok(())
    }
}

impl<'b, C> minicbor::Decode<'b, C> for Part {
    fn decode(
        d: &mut minicbor::Decoder<'b>,
        _ctx: &mut C,
    ) -> Result<Self, minicbor::decode::Error> {
        if d.array()? != Some(5) {
            return Err(minicbor::decode::Error::message(
                "invalid CBOR array length",
            ));
        }
        Ok(Self {
            sequence: d.u32()?,
            sequence_count: d.u32()?,
            message_length: d.u32()?,
            checksum: d.u32()?,
            data: d.bytes()?.to_vec(),
        })
    }
}

impl core::fmt::Display for Part {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "seqNum:{}, seqLen:{}, messageLen:{}, checksum:{}, data:",
            self.sequence, self.sequence_count, self.message_length, self.checksum
        )?;
        for byte in &self.data {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Emits the parts of a single message. Callers must serialize access to
/// one instance; the sequence counter is its only state.
#[derive(Debug)]
pub struct Encoder {
    fragments: Vec<Vec<u8>>,
    message_length: u32,
    checksum: u32,
    current_sequence: u32,
}

impl Encoder {
    /// # Errors
    ///
    /// Fails on an empty or oversized `message`, or if `config` doesn't validate.
    pub fn new(message: &[u8], config: Config) -> Result<Self, Error> {
        config.validate()?;
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let message_length = u32::try_from(message.len()).map_err(|_| Error::MessageTooLong)?;
        let fragment_length = fragment_length(message.len(), config.max_fragment_length);
        let fragments = partition(message, fragment_length);
        tracing::debug!(
            message_length,
            fragment_count = fragments.len(),
            fragment_length,
            "fountain encoder ready"
        );
        Ok(Self {
            fragments,
            message_length,
            checksum: crate::checksum(message),
            current_sequence: config.first_sequence,
        })
    }

    /// Advances the sequence number and mixes the part for it.
    ///
    /// # Errors
    ///
    /// Never fails for an encoder built by [`Encoder::new`].
    pub fn next_part(&mut self) -> Result<Part, Error> {
        self.current_sequence = self.current_sequence.saturating_add(1);
        let indexes = choose_fragments(self.current_sequence, self.fragments.len(), self.checksum)?;
        let mut mixed = alloc::vec![0; self.fragment_length()];
        for &index in &indexes {
            xor_into(&mut mixed, &self.fragments[index]);
        }
        tracing::trace!(
            sequence = self.current_sequence,
            degree = indexes.len(),
            "emitting part"
        );
        Ok(Part {
            sequence: self.current_sequence,
            sequence_count: self.sequence_count(),
            message_length: self.message_length,
            checksum: self.checksum,
            data: mixed,
        })
    }

    /// The sequence number of the last emitted part.
    #[must_use]
    pub const fn current_sequence(&self) -> u32 {
        self.current_sequence
    }

    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn sequence_count(&self) -> u32 {
        // bounded by the u32 message length
        self.fragments.len() as u32
    }

    #[must_use]
    pub fn fragment_length(&self) -> usize {
        self.fragments.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn fragments(&self) -> &[Vec<u8>] {
        &self.fragments
    }

    #[must_use]
    pub fn message_length(&self) -> usize {
        self.message_length as usize
    }

    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Whether every fragment has been emitted unmixed at least once. The
    /// encoder keeps producing parts after that.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_sequence as usize >= self.fragments.len()
    }

    #[must_use]
    pub fn is_single_part(&self) -> bool {
        self.fragments.len() == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Session {
    sequence_count: u32,
    message_length: u32,
    checksum: u32,
    fragment_length: usize,
}

impl Session {
    fn of(part: &Part) -> Result<Self, Error> {
        if part.sequence == 0
            || part.sequence_count == 0
            || part.message_length == 0
            || part.data.is_empty()
        {
            return Err(Error::InvalidPart);
        }
        let session = Self {
            sequence_count: part.sequence_count,
            message_length: part.message_length,
            checksum: part.checksum,
            fragment_length: part.data.len(),
        };
        let message_length = part.message_length as usize;
        if session.fragment_length != message_length.div_ceil(part.sequence_count as usize)
            || part.sequence_count as usize != message_length.div_ceil(session.fragment_length)
        {
            return Err(Error::InconsistentPart);
        }
        Ok(session)
    }
}

/// Reassembles a message from parts received in any order, with losses.
///
/// Mixed parts are peeled: known fragments are xor-ed out of them, and any
/// mixed part whose selection is a subset of another's is xor-ed out of the
/// larger one, until single fragments fall out.
#[derive(Debug)]
pub struct Decoder {
    max_fragment_count: usize,
    session: Option<Session>,
    received: BTreeSet<Vec<usize>>,
    decoded: BTreeMap<usize, Vec<u8>>,
    mixed: BTreeMap<Vec<usize>, Vec<u8>>,
    queue: Vec<(Vec<usize>, Vec<u8>)>,
    message: Option<Vec<u8>>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            max_fragment_count: DEFAULT_MAX_FRAGMENT_COUNT,
            session: None,
            received: BTreeSet::new(),
            decoded: BTreeMap::new(),
            mixed: BTreeMap::new(),
            queue: Vec::new(),
            message: None,
        }
    }
}

impl Decoder {
    /// Rejects parts announcing more than `max_fragment_count` fragments.
    #[must_use]
    pub fn with_max_fragment_count(mut self, max_fragment_count: usize) -> Self {
        self.max_fragment_count = max_fragment_count;
        self
    }

    /// Feeds one part. Returns whether it contributed anything new.
    ///
    /// # Errors
    ///
    /// Fails on a malformed part, a part announcing more fragments than
    /// allowed, a part from a different message, or when the fully
    /// reassembled message fails its checksum.
    pub fn receive(&mut self, part: &Part) -> Result<bool, Error> {
        if self.complete() {
            return Ok(false);
        }
        if part.sequence_count as usize > self.max_fragment_count {
            return Err(Error::InvalidPart);
        }
        let session = Session::of(part)?;
        match self.session {
            Some(current) if current != session => return Err(Error::InconsistentPart),
            Some(_) => {}
            None => self.session = Some(session),
        }

        let indexes = part.indexes()?;
        if !self.received.insert(indexes.clone()) {
            return Ok(false);
        }
        tracing::trace!(sequence = part.sequence, ?indexes, "received part");

        self.queue.push((indexes, part.data.clone()));
        while let Some((indexes, data)) = self.queue.pop() {
            if indexes.len() == 1 {
                self.process_simple(indexes[0], data);
            } else {
                self.process_mixed(indexes, data);
            }
        }

        if self.decoded.len() == session.sequence_count as usize {
            self.finish(session)?;
        }
        Ok(true)
    }

    fn process_simple(&mut self, index: usize, data: Vec<u8>) {
        if self.decoded.contains_key(&index) {
            return;
        }
        self.decoded.insert(index, data);
        let affected: Vec<Vec<usize>> = self
            .mixed
            .keys()
            .filter(|key| key.binary_search(&index).is_ok())
            .cloned()
            .collect();
        for key in affected {
            if let Some(data) = self.mixed.remove(&key) {
                self.queue.push((key, data));
            }
        }
    }

    fn process_mixed(&mut self, mut indexes: Vec<usize>, mut data: Vec<u8>) {
        indexes.retain(|index| match self.decoded.get(index) {
            Some(fragment) => {
                xor_into(&mut data, fragment);
                false
            }
            None => true,
        });
        for (subset, fragment) in &self.mixed {
            if subset.len() < indexes.len() && is_subset(subset, &indexes) {
                xor_into(&mut data, fragment);
                indexes.retain(|index| subset.binary_search(index).is_err());
            }
        }

        match indexes.len() {
            0 => {}
            1 => self.queue.push((indexes, data)),
            _ if self.mixed.contains_key(&indexes) => {}
            _ => {
                let supersets: Vec<Vec<usize>> = self
                    .mixed
                    .keys()
                    .filter(|key| key.len() > indexes.len() && is_subset(&indexes, key))
                    .cloned()
                    .collect();
                for key in supersets {
                    if let Some(mut superset) = self.mixed.remove(&key) {
                        xor_into(&mut superset, &data);
                        let remaining = key
                            .into_iter()
                            .filter(|index| indexes.binary_search(index).is_err())
                            .collect();
                        self.queue.push((remaining, superset));
                    }
                }
                self.mixed.insert(indexes, data);
            }
        }
    }

    fn finish(&mut self, session: Session) -> Result<(), Error> {
        let message = join(
            core::mem::take(&mut self.decoded).into_values(),
            session.message_length as usize,
        );
        self.mixed.clear();
        if crate::checksum(&message) != session.checksum {
            tracing::warn!(
                expected = session.checksum,
                "reassembled message failed its checksum"
            );
            return Err(Error::InvalidChecksum);
        }
        tracing::debug!(message_length = message.len(), "message reassembled");
        self.message = Some(message);
        Ok(())
    }

    #[must_use]
    pub fn complete(&self) -> bool {
        self.message.is_some()
    }

    /// The reassembled message, once [`Decoder::complete`].
    #[must_use]
    pub fn message(&self) -> Option<&[u8]> {
        self.message.as_deref()
    }

    /// Fraction of fragments recovered so far, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        match (&self.message, self.session) {
            (Some(_), _) => 1.0,
            (None, Some(session)) => self.decoded.len() as f64 / f64::from(session.sequence_count),
            (None, None) => 0.0,
        }
    }
}

fn is_subset(small: &[usize], big: &[usize]) -> bool {
    small.iter().all(|index| big.binary_search(index).is_ok())
}
