//! waiting_room — command-line runner for the pedestrian cellular automaton.
//!
//! Loads a JSON scenario (or the built-in 10 m × 8 m hall), runs it, and
//! writes `trajectories.csv`, `step_summaries.csv` and `space_usage.csv` to
//! the output directory.  Set `RUST_LOG=debug` for per-step summaries.

mod scenario;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;

use ca_core::{ExitId, Step};
use ca_grid::Grid;
use ca_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ca_sim::{Pedestrian, PedestrianStore, SimBuilder, SimObserver, StepReport};

use scenario::Scenario;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "waiting_room", version, about = "Run a waiting-room pedestrian simulation")]
struct Cli {
    /// Scenario JSON file.  Runs the built-in hall when omitted.
    scenario: Option<PathBuf>,

    /// Directory for the CSV output.
    #[arg(short, long, default_value = "output/waiting_room")]
    output: PathBuf,

    /// Override the number of steps.
    #[arg(long)]
    steps: Option<u64>,

    /// Override the RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the cell edge length in millimetres.
    #[arg(long)]
    cell_size: Option<f64>,

    /// Worker threads (only used with the `parallel` feature).
    #[arg(long)]
    threads: Option<usize>,

    /// Snapshot every N steps (0 disables trajectory output).
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Print the resolved scenario as JSON and exit.
    #[arg(long)]
    dump_scenario: bool,
}

impl Cli {
    fn apply(&self, scenario: &mut Scenario) {
        let config = &mut scenario.config;
        if let Some(n) = self.steps {
            config.total_steps = n;
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        if let Some(t) = self.threads {
            config.num_threads = t;
        }
        if let Some(i) = self.snapshot_interval {
            config.snapshot_interval_steps = i;
        }
        if let Some(c) = self.cell_size {
            scenario.cell_size = c;
        }
    }
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Forwards to the CSV observer and tallies exits per door.
struct TallyObserver<W: OutputWriter> {
    inner:    SimOutputObserver<W>,
    per_exit: BTreeMap<ExitId, usize>,
    peak:     usize,
}

impl<W: OutputWriter> TallyObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, per_exit: BTreeMap::new(), peak: 0 }
    }
}

impl<W: OutputWriter> SimObserver for TallyObserver<W> {
    fn on_pedestrian_exit(&mut self, _step: Step, ped: &Pedestrian) {
        *self.per_exit.entry(ped.exit).or_default() += 1;
    }

    fn on_step_end(&mut self, step: Step, report: &StepReport) {
        self.peak = self.peak.max(report.pedestrians);
        self.inner.on_step_end(step, report);
    }

    fn on_snapshot(&mut self, step: Step, peds: &PedestrianStore, grid: &Grid) {
        self.inner.on_snapshot(step, peds, grid);
    }

    fn on_sim_end(&mut self, final_step: Step) {
        self.inner.on_sim_end(final_step);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
    {
        eprintln!("logging disabled: {e}");
    }

    let cli = Cli::parse();

    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::builtin(),
    };
    cli.apply(&mut scenario);

    if cli.dump_scenario {
        println!("{}", serde_json::to_string_pretty(&scenario)?);
        return Ok(());
    }

    let Scenario { geometry, params, config, cell_size } = scenario;
    let geometry = geometry.build().context("invalid floor plan")?;
    let mut sim = SimBuilder::new(config, geometry, params)
        .cell_size(cell_size)
        .build()
        .context("building simulation")?;

    println!("=== waiting_room ===");
    println!(
        "Grid {} × {} ({} traversable) | exits {} | pedestrians {} | steps {} | seed {}",
        sim.grid.nx(),
        sim.grid.ny(),
        sim.grid.traversable().count(),
        sim.geometry.exit_count(),
        sim.peds.len(),
        sim.config.total_steps,
        sim.config.seed,
    );

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let writer = CsvWriter::new(&cli.output)?;
    let mut obs = TallyObserver::new(SimOutputObserver::new(writer));

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        bail!("output error: {e}");
    }

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  still inside : {}", sim.peds.len());
    println!("  peak         : {}", obs.peak);
    println!("  exited       : {}", sim.exited);
    for (exit, n) in &obs.per_exit {
        println!("    exit {:<6} {n}", exit.0);
    }
    if let Some(usage) = obs.inner.space_usage() {
        let busiest = usage.rows().into_iter().max_by_key(|r| r.count);
        if let Some(r) = busiest {
            println!(
                "  busiest cell : ({}, {}) occupied {:.1}% of snapshots",
                r.i,
                r.j,
                100.0 * r.count as f64 / usage.steps().max(1) as f64
            );
        }
    }
    println!("Output written to {}", cli.output.display());

    Ok(())
}
