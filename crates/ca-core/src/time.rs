//! Simulation time model.
//!
//! The automaton advances in discrete steps; there is no wall-clock mapping.
//! Every step each pedestrian moves at most one cell.

use std::fmt;

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }

    /// `true` every `interval` steps (and never when `interval == 0`).
    #[inline]
    pub fn is_multiple_of(self, interval: u64) -> bool {
        interval != 0 && self.0 % interval == 0
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level configuration, independent of the scenario.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of steps `Sim::run` executes.
    pub total_steps: u64,
    /// Global RNG seed.  Every random draw in a run derives from it.
    pub seed: u64,
    /// Rayon worker threads for the intent phase.  `0` uses Rayon's default.
    pub num_threads: usize,
    /// Emit an `on_snapshot` observer call every N steps.  `0` disables.
    pub snapshot_interval_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_steps:             1_000,
            seed:                    0,
            num_threads:             0,
            snapshot_interval_steps: 1,
        }
    }
}
