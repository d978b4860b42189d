//! In-memory trajectory log and per-cell occupancy counter.

use ca_core::Step;
use ca_grid::{Cell, Field, Grid, ScalarField};
use ca_sim::{PedestrianStore, SimObserver};

use crate::{SpaceUsageRow, TrajectoryRow};

// ── SpaceUsage ────────────────────────────────────────────────────────────────

/// Counts, per cell, how many recorded steps ended with a pedestrian on it.
#[derive(Clone, Debug)]
pub struct SpaceUsage {
    counts: Field<u64>,
    x:      ScalarField,
    y:      ScalarField,
    steps:  u64,
}

impl SpaceUsage {
    /// An all-zero counter shaped like `grid`.
    pub fn new(grid: &Grid) -> Self {
        Self {
            counts: Field::filled(grid.nx(), grid.ny(), 0),
            x:      grid.x().clone(),
            y:      grid.y().clone(),
            steps:  0,
        }
    }

    /// Add one visit for every occupied cell.
    pub fn record(&mut self, peds: &PedestrianStore) {
        for cell in peds.cells() {
            if let Some(n) = self.counts.get(cell).copied() {
                self.counts[cell] = n + 1;
            }
        }
        self.steps += 1;
    }

    #[inline]
    pub fn count(&self, cell: Cell) -> u64 {
        self.counts.get(cell).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &Field<u64> {
        &self.counts
    }

    /// Number of recorded steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Counts divided by the number of recorded steps: the share of time
    /// each cell was occupied.  All zero before the first step.
    pub fn normalized(&self) -> ScalarField {
        let steps = self.steps.max(1) as f64;
        self.counts.map(|n| *n as f64 / steps)
    }

    /// Visited cells as output rows, in `(i, j)` order.
    pub fn rows(&self) -> Vec<SpaceUsageRow> {
        self.counts
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(c, n)| SpaceUsageRow {
                i:     c.i as u32,
                j:     c.j as u32,
                x:     self.x[c],
                y:     self.y[c],
                count: *n,
            })
            .collect()
    }
}

/// One trajectory row per pedestrian, in ascending id order.
pub(crate) fn trajectory_rows(step: Step, peds: &PedestrianStore, grid: &Grid) -> Vec<TrajectoryRow> {
    peds.iter()
        .map(|p| {
            let centre = grid.centre(p.cell);
            TrajectoryRow {
                step:    step.0,
                ped_id:  p.id.0,
                x:       centre.x,
                y:       centre.y,
                exit_id: p.exit.0,
            }
        })
        .collect()
}

// ── TrajectoryRecorder ────────────────────────────────────────────────────────

/// A [`SimObserver`] that keeps the whole trajectory stream and the space
/// usage counter in memory.
///
/// Rows are appended on every snapshot, so with the default
/// `snapshot_interval_steps = 1` there is one row per pedestrian per step.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryRecorder {
    rows:  Vec<TrajectoryRow>,
    usage: Option<SpaceUsage>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[TrajectoryRow] {
        &self.rows
    }

    /// `None` until the first snapshot.
    pub fn space_usage(&self) -> Option<&SpaceUsage> {
        self.usage.as_ref()
    }

    pub fn into_parts(self) -> (Vec<TrajectoryRow>, Option<SpaceUsage>) {
        (self.rows, self.usage)
    }
}

impl SimObserver for TrajectoryRecorder {
    fn on_snapshot(&mut self, step: Step, peds: &PedestrianStore, grid: &Grid) {
        self.rows.extend(trajectory_rows(step, peds, grid));
        self.usage.get_or_insert_with(|| SpaceUsage::new(grid)).record(peds);
    }
}
