//! Fluent builder for constructing a [`Sim`].

use ca_core::{DEFAULT_CELL_SIZE, ExitId, ScenarioParams, SimConfig, SimRng, Step};
use ca_field::FloorField;
use ca_geometry::Geometry;
use ca_grid::{Cell, Grid};

use crate::{PedestrianRngs, PedestrianStore, Sim, SimError, SimResult};

/// An explicit initial position, replacing random placement.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub cell:     Cell,
    /// `None` assigns a random exit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exit:     Option<ExitId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub standing: bool,
}

impl Placement {
    pub fn new(cell: Cell) -> Self {
        Self { cell, exit: None, standing: false }
    }

    pub fn exit(mut self, exit: ExitId) -> Self {
        self.exit = Some(exit);
        self
    }

    pub fn standing(mut self) -> Self {
        self.standing = true;
        self
    }
}

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total steps, seed, thread count, snapshot interval
/// - [`Geometry`]: a validated floor plan
/// - [`ScenarioParams`]: weights, logistic shapes, population sizes
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                          |
/// |--------------------|--------------------------------------------------|
/// | `.cell_size(mm)`   | [`DEFAULT_CELL_SIZE`] (500 mm)                   |
/// | `.placements(v)`   | `init_pedestrians` on random free cells, the first `standing_pedestrians` of them standing |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, geometry, params)
///     .cell_size(400.0)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:     SimConfig,
    geometry:   Geometry,
    params:     ScenarioParams,
    cell_size:  f64,
    placements: Option<Vec<Placement>>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, geometry: Geometry, params: ScenarioParams) -> Self {
        Self {
            config,
            geometry,
            params,
            cell_size:  DEFAULT_CELL_SIZE,
            placements: None,
        }
    }

    /// Edge length of one cell, millimetres.
    pub fn cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Place exactly these pedestrians at step 0 instead of drawing
    /// `init_pedestrians` random positions.
    pub fn placements(mut self, placements: Vec<Placement>) -> Self {
        self.placements = Some(placements);
        self
    }

    /// Validate inputs, classify the grid, compute the floor fields, place
    /// the initial population, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.params.validate()?;

        // ── Grid and static fields ────────────────────────────────────────
        let grid = Grid::build(&self.geometry, self.cell_size)?;
        let floor = FloorField::compute(&grid, &self.params)?;
        let exits: Vec<ExitId> = floor.exits().collect();

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            0 => None,
            n => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(format!("thread pool: {e}")))?,
            ),
        };

        let mut sim = Sim {
            rng:      SimRng::new(self.config.seed),
            config:   self.config,
            params:   self.params,
            geometry: self.geometry,
            grid,
            floor,
            peds:     PedestrianStore::new(),
            rngs:     PedestrianRngs::new(),
            now:      Step::ZERO,
            exited:   0,
            exits,
            #[cfg(feature = "parallel")]
            pool,
        };

        // ── Initial population ────────────────────────────────────────────
        match self.placements {
            Some(placements) => place_explicit(&mut sim, placements)?,
            None => place_random(&mut sim)?,
        }
        log::info!(
            "sim ready: {} pedestrians on a {}x{} grid, {} exits",
            sim.peds.len(),
            sim.grid.nx(),
            sim.grid.ny(),
            sim.exits.len()
        );
        Ok(sim)
    }
}

fn place_explicit(sim: &mut Sim, placements: Vec<Placement>) -> SimResult<()> {
    if placements.len() > sim.params.max_pedestrians {
        return Err(SimError::Config(format!(
            "{} placements exceed max_pedestrians ({})",
            placements.len(),
            sim.params.max_pedestrians
        )));
    }
    for p in placements {
        if !sim.grid.is_traversable(p.cell) {
            return Err(SimError::Config(format!("placement {} is not traversable", p.cell)));
        }
        let exit = match p.exit {
            Some(exit) if sim.exits.contains(&exit) => exit,
            Some(exit) => return Err(SimError::Config(format!("placement {} names unknown exit {exit}", p.cell))),
            None => sim.random_exit()?,
        };
        sim.spawn(p.cell, exit, p.standing)?;
    }
    Ok(())
}

fn place_random(sim: &mut Sim) -> SimResult<()> {
    let wanted = sim.params.init_pedestrians;
    let mut free: Vec<Cell> = sim.grid.traversable().cells().collect();
    if free.len() < wanted {
        return Err(SimError::Config(format!(
            "only {} traversable cells for {wanted} initial pedestrians",
            free.len()
        )));
    }
    sim.rng.shuffle(&mut free);
    for (k, cell) in free.into_iter().take(wanted).enumerate() {
        let exit = sim.random_exit()?;
        sim.spawn(cell, exit, k < sim.params.standing_pedestrians)?;
    }
    Ok(())
}
