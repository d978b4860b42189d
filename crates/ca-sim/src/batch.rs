//! Independent runs over many scenarios (parameter sweeps).
//!
//! Every job owns its geometry, grid and population; nothing is shared
//! between jobs, so with the `parallel` feature they simply run side by side
//! on Rayon's pool.

use ca_core::{DEFAULT_CELL_SIZE, ScenarioParams, SimConfig};
use ca_geometry::Geometry;

use crate::{SimBuilder, SimObserver, SimResult};

/// One complete scenario to run.
#[derive(Clone)]
pub struct BatchJob {
    pub name:      String,
    pub config:    SimConfig,
    pub geometry:  Geometry,
    pub params:    ScenarioParams,
    pub cell_size: f64,
}

impl BatchJob {
    pub fn new(name: impl Into<String>, config: SimConfig, geometry: Geometry, params: ScenarioParams) -> Self {
        Self {
            name: name.into(),
            config,
            geometry,
            params,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// Build and run every job to completion, each with a fresh observer from
/// `make_observer`.
///
/// Results come back in job order, paired with the job name.  A failing job
/// does not stop the others.
pub fn run_batch<O, F>(jobs: Vec<BatchJob>, make_observer: F) -> Vec<(String, SimResult<O>)>
where
    O: SimObserver + Send,
    F: Fn(&BatchJob) -> O + Sync,
{
    let run_one = |job: BatchJob| {
        let mut observer = make_observer(&job);
        let result = SimBuilder::new(job.config, job.geometry, job.params)
            .cell_size(job.cell_size)
            .build()
            .and_then(|mut sim| sim.run(&mut observer))
            .map(|()| observer);
        if let Err(e) = &result {
            log::warn!("batch job `{}` failed: {e}", job.name);
        }
        (job.name, result)
    };

    #[cfg(not(feature = "parallel"))]
    {
        jobs.into_iter().map(run_one).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        jobs.into_par_iter().map(run_one).collect()
    }
}
