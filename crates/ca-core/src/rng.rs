//! Deterministic RNG streams.
//!
//! # Streams
//!
//! | Stream   | Seed                                   | Draws                                   |
//! |----------|----------------------------------------|-----------------------------------------|
//! | `PedRng` | `seed ^ (ped_id · φ64)`                | that pedestrian's neighbor choice       |
//! | `SimRng` | `seed`                                 | placement, exits, injection, lotteries  |
//!
//! `φ64` is the golden-ratio constant `0x9e37_79b9_7f4a_7c15`; multiplying by
//! it scatters consecutive ids over the whole seed space.  A pedestrian's
//! stream depends on nothing but the run seed and its own id, so the intent
//! phase gives the same draws on one thread or many, and injecting newcomers
//! leaves existing streams untouched.  `SimRng` is only touched from
//! sequential code.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::PedId;

const PHI64: u64 = 0x9e37_79b9_7f4a_7c15;

/// Index drawn from `weights` proportionally.  Non-finite and negative
/// weights count as zero; `None` if nothing positive remains.
fn weighted_index<R: Rng>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    let cleaned = weights.iter().map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 });
    let dist = WeightedIndex::new(cleaned).ok()?;
    Some(dist.sample(rng))
}

// ── PedRng ────────────────────────────────────────────────────────────────────

/// One pedestrian's private stream.  During the parallel intent phase every
/// worker holds `&mut` to a disjoint set of these.
pub struct PedRng(SmallRng);

impl PedRng {
    pub fn new(global_seed: u64, ped: PedId) -> Self {
        PedRng(SmallRng::seed_from_u64(global_seed ^ (ped.0 as u64).wrapping_mul(PHI64)))
    }

    #[inline]
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        weighted_index(&mut self.0, weights)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// The run-wide stream.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }

    /// `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    #[inline]
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        weighted_index(&mut self.0, weights)
    }
}
