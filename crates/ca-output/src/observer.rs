//! Streaming output: `SimObserver` hooks forwarded to an `OutputWriter`.

use ca_core::Step;
use ca_grid::Grid;
use ca_sim::{PedestrianStore, SimObserver, StepReport};

use crate::recorder::{SpaceUsage, trajectory_rows};
use crate::row::StepSummaryRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Streams trajectories and step summaries to an [`OutputWriter`] and writes
/// the space usage counts when the run ends.
///
/// Observer hooks cannot fail, so the first write error is parked here;
/// collect it with [`take_error`][Self::take_error] once the run is over.
/// Later errors are logged and dropped.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    usage:      Option<SpaceUsage>,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            usage:      None,
            rows:       0,
            last_error: None,
        }
    }

    /// The first write error of the run, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Space usage accumulated so far.
    pub fn space_usage(&self) -> Option<&SpaceUsage> {
        self.usage.as_ref()
    }

    /// Give the backend back, e.g. to read its buffers in tests.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        let Err(e) = result else { return };
        log::error!("output write failed: {e}");
        self.last_error.get_or_insert(e);
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_end(&mut self, step: Step, report: &StepReport) {
        let row = StepSummaryRow {
            step:        step.0,
            pedestrians: report.pedestrians as u64,
            moved:       report.moved as u64,
            conflicts:   report.conflicts as u64,
            injected:    report.injected as u64,
            exited:      report.exited.len() as u64,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Step, peds: &PedestrianStore, grid: &Grid) {
        self.usage.get_or_insert_with(|| SpaceUsage::new(grid)).record(peds);

        let rows = trajectory_rows(step, peds, grid);
        if !rows.is_empty() {
            self.rows += rows.len() as u64;
            let result = self.writer.write_trajectories(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, final_step: Step) {
        if let Some(usage) = &self.usage {
            let result = self.writer.write_space_usage(&usage.rows());
            self.store_err(result);
        }
        let result = self.writer.finish();
        self.store_err(result);
        log::info!("output finished at {final_step}: {} trajectory rows", self.rows);
    }
}
