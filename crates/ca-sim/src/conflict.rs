//! Conflict resolution between drawn targets.
//!
//! 1. Pedestrians are grouped by target cell.  Every group of two or more
//!    holds a lottery: weight = drawn probability mass, or [`STAY_WEIGHT`]
//!    for a pedestrian that drew its own cell.  Losers stay where they are.
//! 2. Cascade: a pedestrian whose target is the cell of someone who ends the
//!    step in place is held back too.  Repeated until nothing changes, so
//!    chains of followers collapse correctly.  Two pedestrians swapping cells
//!    is allowed.
//!
//! After both passes every final cell is distinct.

use std::collections::{BTreeMap, HashMap};

use ca_core::{PedId, SimRng};
use ca_grid::Cell;

/// Lottery weight of a pedestrian that wants to keep its own cell.
pub const STAY_WEIGHT: f64 = 1.0e6;

/// One pedestrian's drawn move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Proposal {
    pub ped:  PedId,
    pub from: Cell,
    pub to:   Cell,
    /// Probability mass of the drawn key.
    pub mass: f64,
}

impl Proposal {
    #[inline]
    pub fn is_stay(&self) -> bool {
        self.from == self.to
    }

    fn lottery_weight(&self) -> f64 {
        if self.is_stay() { STAY_WEIGHT } else { self.mass }
    }
}

/// Result of [`resolve`].
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    /// Final cell of every proposing pedestrian.
    pub targets:   BTreeMap<PedId, Cell>,
    /// Number of target cells drawn by more than one pedestrian.
    pub conflicts: usize,
}

/// Resolve `proposals` (one per pedestrian, any order) into final cells.
///
/// The lottery draws from `rng` in ascending target-cell order, so the
/// outcome depends only on the proposals and the RNG state.
pub fn resolve(proposals: &[Proposal], rng: &mut SimRng) -> Resolution {
    let mut finals: Vec<Cell> = proposals.iter().map(|p| p.to).collect();

    // ── Lottery ───────────────────────────────────────────────────────────
    let mut groups: BTreeMap<Cell, Vec<usize>> = BTreeMap::new();
    for (k, p) in proposals.iter().enumerate() {
        groups.entry(p.to).or_default().push(k);
    }

    let mut conflicts = 0;
    for members in groups.values_mut().filter(|m| m.len() > 1) {
        conflicts += 1;
        members.sort_by_key(|&k| proposals[k].ped);
        let weights: Vec<f64> = members.iter().map(|&k| proposals[k].lottery_weight()).collect();
        let winner = rng
            .weighted_index(&weights)
            .or_else(|| members.iter().position(|&k| proposals[k].is_stay()))
            .unwrap_or(0);
        for (slot, &k) in members.iter().enumerate() {
            if slot != winner {
                finals[k] = proposals[k].from;
            }
        }
    }

    // ── Cascade ───────────────────────────────────────────────────────────
    let origin: HashMap<Cell, usize> = proposals.iter().enumerate().map(|(k, p)| (p.from, k)).collect();
    loop {
        let mut changed = false;
        for k in 0..proposals.len() {
            let target = finals[k];
            if target == proposals[k].from {
                continue;
            }
            let blocked = origin.get(&target).is_some_and(|&o| finals[o] == proposals[o].from);
            if blocked {
                finals[k] = proposals[k].from;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    Resolution {
        targets: proposals.iter().zip(finals).map(|(p, c)| (p.ped, c)).collect(),
        conflicts,
    }
}
