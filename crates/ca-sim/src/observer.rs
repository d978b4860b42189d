//! Hooks into the step loop.

use ca_core::Step;
use ca_grid::Grid;

use crate::{Pedestrian, PedestrianStore, StepReport};

/// Called by [`Sim::step`][crate::Sim::step] as each step unfolds, and by
/// [`Sim::run`][crate::Sim::run] once at the end.  Every hook defaults to a
/// no-op.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Ticker { every: u64 }
///
/// impl SimObserver for Ticker {
///     fn on_step_end(&mut self, step: Step, report: &StepReport) {
///         if step.is_multiple_of(self.every) {
///             println!("{step}: {} moved, {} conflicts", report.moved, report.conflicts);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any processing.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called once per pedestrian removed at its exit, before `on_step_end`.
    fn on_pedestrian_exit(&mut self, _step: Step, _ped: &Pedestrian) {}

    /// Called after the step has been committed.
    fn on_step_end(&mut self, _step: Step, _report: &StepReport) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_steps`
    /// steps) with the committed positions.
    ///
    /// The grid is passed along so writers can turn cells into coordinates
    /// without the sim knowing about any output format.
    fn on_snapshot(&mut self, _step: Step, _peds: &PedestrianStore, _grid: &Grid) {}

    /// Called once after the final step completes.
    fn on_sim_end(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
