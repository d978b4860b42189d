//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `trajectories.csv`
//! - `step_summaries.csv`
//! - `space_usage.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, SpaceUsageRow, StepSummaryRow, TrajectoryRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    trajectories: Writer<File>,
    summaries:    Writer<File>,
    usage:        Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trajectories = Writer::from_path(dir.join("trajectories.csv"))?;
        trajectories.write_record(["step", "id", "x", "y", "exit_id"])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(["step", "pedestrians", "moved", "conflicts", "injected", "exited"])?;

        let mut usage = Writer::from_path(dir.join("space_usage.csv"))?;
        usage.write_record(["i", "j", "x", "y", "count"])?;

        Ok(Self {
            trajectories,
            summaries,
            usage,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        for row in rows {
            self.trajectories.write_record(&[
                row.step.to_string(),
                row.ped_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.exit_id.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            row.pedestrians.to_string(),
            row.moved.to_string(),
            row.conflicts.to_string(),
            row.injected.to_string(),
            row.exited.to_string(),
        ])?;
        Ok(())
    }

    fn write_space_usage(&mut self, rows: &[SpaceUsageRow]) -> OutputResult<()> {
        for row in rows {
            self.usage.write_record(&[
                row.i.to_string(),
                row.j.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trajectories.flush()?;
        self.summaries.flush()?;
        self.usage.flush()?;
        Ok(())
    }
}
