//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! A run owns exactly one `SimRng`, seeded once from `SimConfig::seed`.
//! Every random draw (enrollment, arrival shifts, lunch windows, leisure
//! destinations) goes through it, and callbacks execute strictly in
//! scheduler order, so the same seed always reproduces the same trace.
//!
//! Callers must iterate ordered collections (`BTreeMap`, `Vec`) when they
//! draw per element; a `HashMap` walk would make draw order depend on the
//! hasher's random state.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// The single shared pseudo-random source of a simulation run.
///
/// Used only from the sequential callback stream; it is not shared across
/// threads.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// Fisher-Yates, in place.
    #[inline]
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }

    /// Uniform pick; `None` only for an empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }

    /// Index drawn with probability proportional to `weights[i]`.
    ///
    /// Returns `None` for an empty slice.  A single entry is always chosen,
    /// whatever its weight.  If the weights cannot form a distribution
    /// (all zero, negative, non-finite) the draw falls back to uniform.
    pub fn choose_weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        match weights.len() {
            0 => None,
            1 => Some(0),
            n => match WeightedIndex::new(weights) {
                Ok(dist) => Some(dist.sample(&mut self.0)),
                Err(_) => Some(self.0.gen_range(0..n)),
            },
        }
    }
}
