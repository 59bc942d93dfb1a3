//! Walker's alias method over a discrete weight vector.

use alloc::vec::Vec;

use crate::xoshiro::Xoshiro256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no weights given")]
    Empty,
    #[error("negative probability encountered")]
    NegativeWeight,
    #[error("probabilities don't sum to a positive value")]
    NonPositiveSum,
}

/// Probability and alias tables, built once in `O(n)` and sampled in `O(1)`.
#[derive(Debug)]
pub struct Weighted {
    aliases: Vec<u32>,
    probs: Vec<f64>,
}

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
impl Weighted {
    /// Builds the tables for `weights`, which need not be normalized.
    ///
    /// # Errors
    ///
    /// Fails on an empty vector, a negative weight, or weights summing to zero.
    pub fn new(mut weights: Vec<f64>) -> Result<Self, Error> {
        if weights.is_empty() {
            return Err(Error::Empty);
        }
        if weights.iter().any(|&w| w < 0.0) {
            return Err(Error::NegativeWeight);
        }
        let summed = weights.iter().sum::<f64>();
        if summed <= 0.0 {
            return Err(Error::NonPositiveSum);
        }
        let count = weights.len();
        for w in &mut weights {
            *w *= count as f64 / summed;
        }

        // Both worklists are stacks seeded in descending index order.
        let (mut light, mut heavy): (Vec<usize>, Vec<usize>) =
            (0..count).rev().partition(|&j| weights[j] < 1.0);

        let mut probs = alloc::vec![0.0; count];
        let mut aliases = alloc::vec![0; count];

        while let (Some(&small), Some(&large)) = (light.last(), heavy.last()) {
            light.pop();
            heavy.pop();
            probs[small] = weights[small];
            aliases[small] = large as u32;
            weights[large] += weights[small] - 1.0;
            if weights[large] < 1.0 {
                light.push(large);
            } else {
                heavy.push(large);
            }
        }

        for index in heavy.into_iter().chain(light) {
            probs[index] = 1.0;
        }

        Ok(Self { aliases, probs })
    }

    /// Draws an index, consuming two doubles from `xoshiro`.
    #[allow(clippy::cast_sign_loss)]
    pub fn next(&self, xoshiro: &mut Xoshiro256) -> usize {
        let r1 = xoshiro.next_double();
        let r2 = xoshiro.next_double();
        let count = self.probs.len();
        let i = ((count as f64 * r1) as usize).min(count - 1);
        if r2 < self.probs[i] {
            i
        } else {
            self.aliases[i] as usize
        }
    }
}
