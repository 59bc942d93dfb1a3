//! Seeded `xoshiro256**` stream shared by every fountain implementation.
//!
//! The generator is a pure function of its seed: the seed is hashed with
//! SHA-256 and the digest is read as four big-endian 64-bit lanes.

use alloc::vec::Vec;

use bitcoin_hashes::Hash;
use rand_xoshiro::rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::sampler::Weighted;

#[allow(clippy::module_name_repetitions)]
pub struct Xoshiro256 {
    inner: Xoshiro256StarStar,
}

impl From<&[u8]> for Xoshiro256 {
    fn from(seed: &[u8]) -> Self {
        let digest = bitcoin_hashes::sha256::Hash::hash(seed).to_byte_array();
        Self::from(digest)
    }
}

impl From<&str> for Xoshiro256 {
    fn from(seed: &str) -> Self {
        Self::from(seed.as_bytes())
    }
}

impl From<[u8; 32]> for Xoshiro256 {
    /// Uses `digest` directly as the state, one big-endian lane per 8 bytes.
    fn from(digest: [u8; 32]) -> Self {
        // rand_core reads its seed as little-endian lanes
        let mut seed = digest;
        for lane in seed.chunks_exact_mut(8) {
            lane.reverse();
        }
        Self {
            inner: Xoshiro256StarStar::from_seed(seed),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
impl Xoshiro256 {
    /// Seeds the generator with the CRC32 of `data`, big-endian.
    #[must_use]
    pub fn from_crc(data: &[u8]) -> Self {
        Self::from(&crate::checksum(data).to_be_bytes()[..])
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// A value in `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        self.next() as f64 / (u64::MAX as f64 + 1.0)
    }

    /// A value in `low..=high`.
    pub fn next_int(&mut self, low: u64, high: u64) -> u64 {
        // next_double rounds up to 1.0 for the topmost outputs
        ((self.next_double() * ((high - low + 1) as f64)) as u64 + low).min(high)
    }

    pub fn next_byte(&mut self) -> u8 {
        self.next_int(0, 255) as u8
    }

    pub fn next_bytes(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.next_byte()).collect()
    }

    /// Permutes `items` by repeatedly removing a uniformly drawn element,
    /// the draw indexing the elements still left. Runs in `O(n log n)`.
    pub fn shuffled<T>(&mut self, items: Vec<T>) -> Vec<T> {
        let count = items.len();
        let mut remaining = Remaining::new(count);
        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        let mut shuffled = Vec::with_capacity(count);
        for left in (1..=count).rev() {
            let rank = self.next_int(0, (left - 1) as u64) as usize;
            if let Some(item) = slots[remaining.take(rank)].take() {
                shuffled.push(item);
            }
        }
        shuffled
    }

    /// Draws how many of `fragment_count` fragments to mix, in
    /// `1..=fragment_count`, with degree `d` weighted by `1 / d`.
    ///
    /// # Errors
    ///
    /// Fails if `fragment_count` is zero.
    pub fn choose_degree(&mut self, fragment_count: usize) -> Result<usize, crate::sampler::Error> {
        let weights = (1..=fragment_count).map(|d| 1.0 / d as f64).collect();
        let sampler = Weighted::new(weights)?;
        Ok(sampler.next(self) + 1)
    }
}

/// Positions `0..n` not yet taken, as a Fenwick tree of counts.
struct Remaining {
    tree: Vec<usize>,
}

impl Remaining {
    fn new(n: usize) -> Self {
        // every position present: node i covers lowbit(i) positions
        let tree = (0..=n).map(|i| i & i.wrapping_neg()).collect();
        Self { tree }
    }

    /// Removes and returns the position with `rank` untaken positions before it.
    fn take(&mut self, mut rank: usize) -> usize {
        let n = self.tree.len() - 1;
        let mut position = 0;
        let mut step = if n == 0 { 0 } else { 1 << (usize::BITS - 1 - n.leading_zeros()) };
        while step > 0 {
            let next = position + step;
            if next <= n && self.tree[next] <= rank {
                position = next;
                rank -= self.tree[next];
            }
            step >>= 1;
        }
        let mut node = position + 1;
        while node <= n {
            self.tree[node] -= 1;
            node += node & node.wrapping_neg();
        }
        position
    }
}
