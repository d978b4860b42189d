//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, SpaceUsageRow, StepSummaryRow, TrajectoryRow};

/// Persistence backend for a run's output.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one snapshot's worth of trajectory rows.
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Write the final per-cell visit counts.  Called once, at run end.
    fn write_space_usage(&mut self, rows: &[SpaceUsageRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
