//! `ca-output` — trajectory recording and output writers for the
//! waiting-room pedestrian cellular automaton.
//!
//! | Type                   | Role                                                   |
//! |------------------------|--------------------------------------------------------|
//! | [`TrajectoryRecorder`] | in-memory `(step, id, x, y, exit_id)` log + space usage |
//! | [`SpaceUsage`]         | per-cell visit counter, normalisable by step count     |
//! | [`SimOutputObserver`]  | streams the same data to an [`OutputWriter`]           |
//! | [`CsvWriter`]          | `trajectories.csv`, `step_summaries.csv`, `space_usage.csv` |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ca_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use recorder::{SpaceUsage, TrajectoryRecorder};
pub use row::{SpaceUsageRow, StepSummaryRow, TrajectoryRow};
pub use writer::OutputWriter;
