//! The `Sim` struct and its step loop.

use ca_core::{CaError, ExitId, Neighbor, NeighborMap, PedId, PedRng, ScenarioParams, SimConfig, SimRng, Step};
use ca_desire::DesireModel;
use ca_field::{FieldResult, FloorField, combine, individual_field};
use ca_geometry::Geometry;
use ca_grid::{Cell, Grid, ScalarField};

use crate::conflict::{Proposal, Resolution, resolve};
use crate::{Pedestrian, PedestrianRngs, PedestrianStore, SimError, SimObserver, SimResult};

// ── StepReport ────────────────────────────────────────────────────────────────

/// What happened during one step.  Handed to
/// [`SimObserver::on_step_end`] and returned by [`Sim::step`].
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    /// Pedestrians on the floor after the step.
    pub pedestrians: usize,
    /// Pedestrians that changed cell.
    pub moved:       usize,
    /// Target cells drawn by more than one pedestrian.
    pub conflicts:   usize,
    /// Pedestrians injected at entrances.
    pub injected:    usize,
    /// Pedestrians removed at their exit, in ascending id order.
    pub exited:      Vec<Pedestrian>,
}

// ── Per-pedestrian inputs assembled before the intent phase ───────────────────

/// Copied out of the store so the (potentially parallel) intent phase only
/// reads immutable data.
struct IntentInput {
    ped:      PedId,
    cell:     Cell,
    last:     Neighbor,
    standing: bool,
    exit:     ExitId,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each step runs five phases:
///
/// 1. **Injection**: entrances whose interval divides the step number place
///    up to `batch_size` new pedestrians on free entrance cells, never
///    exceeding `max_pedestrians`.
/// 2. **Intent phase** (parallel with the `parallel` feature): every
///    pedestrian draws a target from its neighbor probabilities with its own
///    RNG.  Standing pedestrians always draw their own cell.
/// 3. **Conflict resolution** (sequential): lottery plus cascade, see
///    [`conflict`](crate::conflict).
/// 4. **Commit**: positions, directions and not-moving counters are
///    updated; the occupancy index is rebuilt and checked.
/// 5. **Exit removal** (if `remove_at_exit`): pedestrians on or next to
///    their exit leave the floor.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config:   SimConfig,
    pub params:   ScenarioParams,
    pub geometry: Geometry,
    pub grid:     Grid,
    /// Per-exit static floor fields.
    pub floor:    FloorField,

    /// Pedestrian records.  Read-only outside the commit phase.
    pub peds: PedestrianStore,

    /// Per-pedestrian RNGs, separated for the split-borrow pattern.
    pub rngs: PedestrianRngs,

    /// Placement, exit assignment and conflict lotteries.
    pub rng: SimRng,

    /// The next step to execute.
    pub now: Step,

    /// Pedestrians removed at an exit so far.
    pub exited: usize,

    pub(crate) exits: Vec<ExitId>,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current step up to `config.total_steps`.
    ///
    /// Calls observer hooks at every step boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.now.0 < self.config.total_steps {
            self.step(observer)?;
        }
        observer.on_sim_end(self.now);
        Ok(())
    }

    /// Run exactly `n` steps from the current position (ignores
    /// `total_steps`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Execute one step and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StepReport> {
        let now = self.now;
        observer.on_step_start(now);
        let report = self.process_step(now)?;
        for ped in &report.exited {
            observer.on_pedestrian_exit(now, ped);
        }
        observer.on_step_end(now, &report);
        if now.is_multiple_of(self.config.snapshot_interval_steps) {
            observer.on_snapshot(now, &self.peds, &self.grid);
        }
        self.now = now + 1;
        Ok(report)
    }

    /// The distribution pedestrian `id` would draw its next move from, given
    /// the current positions of everyone else.
    pub fn neighbor_probabilities(&self, id: PedId) -> SimResult<NeighborMap<f64>> {
        let ped = self.peds.get(id).ok_or(CaError::PedestrianNotFound(id))?;
        let model = DesireModel::new(&self.grid, &self.geometry, &self.params);
        let others = self.peds.iter().filter(|p| p.id != id).map(|p| p.cell);
        let field = decision_field(&model, &self.floor, ped.exit, others)?;
        Ok(model.probabilities(ped.cell, ped.direction, &field))
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn process_step(&mut self, now: Step) -> SimResult<StepReport> {
        // ── Phase 1: entrance injection ───────────────────────────────────
        let injected = self.inject(now)?;

        // ── Phase 2: intent phase (produce) ───────────────────────────────
        let proposals = self.compute_intents()?;

        // ── Phase 3: conflict resolution ──────────────────────────────────
        let Resolution { targets, conflicts } = resolve(&proposals, &mut self.rng);

        // ── Phase 4: commit ───────────────────────────────────────────────
        let moved = self.peds.commit(&targets)?;

        // ── Phase 5: exit removal ─────────────────────────────────────────
        let exited = if self.params.remove_at_exit { self.remove_arrived() } else { Vec::new() };
        self.exited += exited.len();

        let pedestrians = self.peds.len();
        log::debug!(
            "{now}: {pedestrians} pedestrians, {moved} moved, {conflicts} conflicts, {injected} injected, {} exited",
            exited.len()
        );
        Ok(StepReport { pedestrians, moved, conflicts, injected, exited })
    }

    /// Draw one target per pedestrian.
    ///
    /// With the `parallel` Cargo feature, the draws run on Rayon's thread
    /// pool.  Every draw uses only the pedestrian's own RNG, so the result is
    /// identical either way.
    fn compute_intents(&mut self) -> SimResult<Vec<Proposal>> {
        let inputs: Vec<IntentInput> = self
            .peds
            .iter()
            .map(|p| IntentInput {
                ped:      p.id,
                cell:     p.cell,
                last:     p.direction,
                standing: p.standing,
                exit:     p.exit,
            })
            .collect();
        let ids: Vec<PedId> = inputs.iter().map(|i| i.ped).collect();
        let occupied: Vec<Cell> = inputs.iter().map(|i| i.cell).collect();

        // Explicit field borrows so the borrow checker sees disjoint access.
        let model = DesireModel::new(&self.grid, &self.geometry, &self.params);
        let floor = &self.floor;
        let rngs = self
            .rngs
            .get_many_mut(&ids)
            .ok_or_else(|| SimError::Config("pedestrian RNGs out of sync with the store".into()))?;

        #[cfg(not(feature = "parallel"))]
        let proposals: FieldResult<Vec<Proposal>> = inputs
            .iter()
            .zip(rngs)
            .enumerate()
            .map(|(k, (input, rng))| draw_intent(&model, floor, &occupied, k, input, rng))
            .collect();

        #[cfg(feature = "parallel")]
        let proposals: FieldResult<Vec<Proposal>> = {
            use rayon::prelude::*;

            let job = || {
                inputs
                    .par_iter()
                    .zip(rngs.into_par_iter())
                    .enumerate()
                    .map(|(k, (input, rng))| draw_intent(&model, floor, &occupied, k, input, rng))
                    .collect::<FieldResult<Vec<Proposal>>>()
            };
            match &self.pool {
                Some(pool) => pool.install(job),
                None => job(),
            }
        };

        Ok(proposals?)
    }

    fn inject(&mut self, now: Step) -> SimResult<usize> {
        let due: Vec<_> = self
            .geometry
            .entrances()
            .iter()
            .filter(|(_, e)| now.is_multiple_of(e.injection_interval()))
            .map(|(id, e)| (*id, e.batch_size))
            .collect();

        let mut injected = 0;
        for (entrance, batch) in due {
            let room = self.params.max_pedestrians.saturating_sub(self.peds.len());
            if room == 0 {
                break;
            }
            let mut free: Vec<Cell> = self
                .grid
                .entrance_cells(entrance)
                .iter()
                .copied()
                .filter(|c| self.peds.is_free(*c))
                .collect();
            self.rng.shuffle(&mut free);
            for cell in free.into_iter().take(batch.min(room)) {
                let exit = self.random_exit()?;
                let id = self.spawn(cell, exit, false)?;
                log::debug!("{now}: injected {id} at {cell} (entrance {entrance}, exit {exit})");
                injected += 1;
            }
        }
        Ok(injected)
    }

    fn remove_arrived(&mut self) -> Vec<Pedestrian> {
        let arrived: Vec<PedId> = self
            .peds
            .iter()
            .filter(|p| !p.standing && self.grid.touches_exit(p.cell, p.exit))
            .map(|p| p.id)
            .collect();
        arrived
            .into_iter()
            .filter_map(|id| {
                self.rngs.remove(id);
                self.peds.remove(id)
            })
            .collect()
    }

    // ── Population helpers (shared with the builder) ──────────────────────

    pub(crate) fn spawn(&mut self, cell: Cell, exit: ExitId, standing: bool) -> SimResult<PedId> {
        let id = self.peds.spawn(cell, exit, standing)?;
        self.rngs.insert(self.config.seed, id);
        Ok(id)
    }

    pub(crate) fn random_exit(&mut self) -> SimResult<ExitId> {
        self.rng
            .choose(&self.exits)
            .copied()
            .ok_or_else(|| SimError::Config("scenario has no exits".into()))
    }
}

// ── Intent helpers ────────────────────────────────────────────────────────────

/// `static[exit] × individual(others)`.
fn decision_field<I>(model: &DesireModel<'_>, floor: &FloorField, exit: ExitId, others: I) -> FieldResult<ScalarField>
where
    I: IntoIterator<Item = Cell>,
{
    let individual = individual_field(model.grid, others, model.params.ped);
    Ok(combine(floor.get(exit)?, &individual))
}

/// Draw the target of the pedestrian at position `k` of `occupied`.
fn draw_intent(
    model:    &DesireModel<'_>,
    floor:    &FloorField,
    occupied: &[Cell],
    k:        usize,
    input:    &IntentInput,
    rng:      &mut PedRng,
) -> FieldResult<Proposal> {
    let stay = Proposal { ped: input.ped, from: input.cell, to: input.cell, mass: 1.0 };
    if input.standing {
        return Ok(stay);
    }

    let others = occupied.iter().enumerate().filter(|&(m, _)| m != k).map(|(_, c)| *c);
    let field = decision_field(model, floor, input.exit, others)?;
    let probs = model.probabilities(input.cell, input.last, &field);
    let (keys, weights): (Vec<Neighbor>, Vec<f64>) = probs.iter().map(|(key, w)| (key, *w)).unzip();

    let Some(drawn) = rng.weighted_index(&weights) else {
        return Ok(stay);
    };
    let to = input.cell.step(keys[drawn]).unwrap_or(input.cell);
    debug_assert!(model.grid.is_traversable(to), "{} drew non-traversable {to}", input.ped);
    Ok(Proposal { to, mass: weights[drawn], ..stay })
}
