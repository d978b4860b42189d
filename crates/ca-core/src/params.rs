//! Scenario parameters consumed by the field generators and the step
//! executor.
//!
//! Distances are millimetres everywhere in the workspace; [`Logistic`] takes
//! a millimetre distance and applies its `b` offset in metres, so parameter
//! files stay readable (`exit.b = 5` means "half-way point five metres from
//! the exit").

use crate::{CaError, CaResult, MM_PER_M};

// ── Logistic ──────────────────────────────────────────────────────────────────

/// Parametric logistic turning a distance into a value in `[0, 1]`.
///
/// ```text
/// inc(d) = 1 / (1 + exp(-c · (d / 1000 − b)))
/// dec(d) = 1 − inc(d)
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Logistic {
    /// Offset of the half-way point, metres.
    pub b: f64,
    /// Steepness, per metre.
    pub c: f64,
}

impl Logistic {
    pub const fn new(b: f64, c: f64) -> Self {
        Self { b, c }
    }

    /// Rises with distance.  `d = +∞` (unreachable) maps to the limit value.
    #[inline]
    pub fn inc(&self, d_mm: f64) -> f64 {
        if d_mm == f64::INFINITY {
            return if self.c > 0.0 {
                1.0
            } else if self.c < 0.0 {
                0.0
            } else {
                0.5
            };
        }
        1.0 / (1.0 + (-self.c * (d_mm / MM_PER_M - self.b)).exp())
    }

    /// Falls with distance.
    #[inline]
    pub fn dec(&self, d_mm: f64) -> f64 {
        1.0 - self.inc(d_mm)
    }
}

// ── Weights ───────────────────────────────────────────────────────────────────

/// Linear-combination weights of the static floor field.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Weights {
    /// Gate weight of the entrance term.  `0` disables the gate.
    pub door: f64,
    pub exit: f64,
    pub wall: f64,
    pub attraction_ground: f64,
    pub attraction_mounted: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            door:               1.0,
            exit:               1.0,
            wall:               1.0,
            attraction_ground:  1.0,
            attraction_mounted: 1.0,
        }
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

/// How the combined field is reduced over the visible part of a neighbor's
/// Voronoi region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Aggregation {
    #[default]
    Max,
    Mean,
}

// ── ScenarioParams ────────────────────────────────────────────────────────────

/// Everything about a scenario that is not geometry.
///
/// Typically loaded from JSON by the application crate.  Call
/// [`validate`](Self::validate) before handing it to a simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScenarioParams {
    pub weights: Weights,

    /// Entrance distance shaping (`inc`: further from the entrance is better).
    pub door: Logistic,
    /// Exit distance shaping (`dec`).
    pub exit: Logistic,
    /// Wall distance shaping (`dec`: hugging walls is mildly preferred).
    pub wall: Logistic,
    /// Other-pedestrian distance shaping (`inc`).
    pub ped: Logistic,
    pub attraction_ground: Logistic,
    pub attraction_mounted: Logistic,
    /// Down-weighting of far cells seen through a neighbor's region (`dec`).
    pub distance: Logistic,

    /// Pedestrians placed at step 0.
    pub init_pedestrians: usize,
    /// Upper bound on simultaneously simulated pedestrians (entrance
    /// injection stops at this count).
    pub max_pedestrians: usize,
    /// How many of the initial pedestrians never move.
    pub standing_pedestrians: usize,

    /// Reweight neighbor probabilities by the last movement direction.
    pub direction_persistence: bool,
    pub aggregation: Aggregation,
    /// Remove pedestrians once they stand on or next to their exit.
    pub remove_at_exit: bool,
    /// Exit distances propagate this many times faster inside attraction
    /// cells.  `1.0` disables the effect.
    pub attraction_speedup: f64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            weights:              Weights::default(),
            door:                 Logistic::new(10.0, 0.5),
            exit:                 Logistic::new(5.0, 0.5),
            wall:                 Logistic::new(1.0, 1.0),
            ped:                  Logistic::new(5.0, 1.0),
            attraction_ground:    Logistic::new(2.0, 0.5),
            attraction_mounted:   Logistic::new(2.0, 0.1),
            distance:             Logistic::new(40.0, 0.02),
            init_pedestrians:     20,
            max_pedestrians:      100,
            standing_pedestrians: 0,
            direction_persistence: true,
            aggregation:          Aggregation::Max,
            remove_at_exit:       false,
            attraction_speedup:   1.0,
        }
    }
}

impl ScenarioParams {
    /// Reject parameter sets that would make the fields meaningless.
    pub fn validate(&self) -> CaResult<()> {
        let w = &self.weights;
        for (name, v) in [
            ("door", w.door),
            ("exit", w.exit),
            ("wall", w.wall),
            ("attraction_ground", w.attraction_ground),
            ("attraction_mounted", w.attraction_mounted),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(CaError::Config(format!("weight `{name}` must be finite and >= 0, got {v}")));
            }
        }

        for (name, l) in [
            ("door", self.door),
            ("exit", self.exit),
            ("wall", self.wall),
            ("ped", self.ped),
            ("attraction_ground", self.attraction_ground),
            ("attraction_mounted", self.attraction_mounted),
            ("distance", self.distance),
        ] {
            if !l.b.is_finite() || !l.c.is_finite() {
                return Err(CaError::Config(format!("logistic `{name}` has non-finite parameters")));
            }
        }

        if self.standing_pedestrians > self.init_pedestrians {
            return Err(CaError::Config(format!(
                "standing_pedestrians ({}) exceeds init_pedestrians ({})",
                self.standing_pedestrians, self.init_pedestrians
            )));
        }
        if self.init_pedestrians > self.max_pedestrians {
            return Err(CaError::Config(format!(
                "init_pedestrians ({}) exceeds max_pedestrians ({})",
                self.init_pedestrians, self.max_pedestrians
            )));
        }
        if !(self.attraction_speedup.is_finite() && self.attraction_speedup > 0.0) {
            return Err(CaError::Config(format!(
                "attraction_speedup must be > 0, got {}",
                self.attraction_speedup
            )));
        }
        Ok(())
    }
}
