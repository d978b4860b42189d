//! Static floor field per exit.

use std::collections::BTreeMap;

use ca_core::{ExitId, ScenarioParams};
use ca_geometry::AttractionKind;
use ca_grid::{CellMask, Grid, ScalarField};

use crate::error::{FieldError, FieldResult};
use crate::fmm::fast_marching;

/// Exit id → static desirability over the grid.  Zero on every cell that is
/// not traversable.
#[derive(Clone, Debug)]
pub struct FloorField {
    fields: BTreeMap<ExitId, ScalarField>,
}

/// Exit-independent terms, computed once and shared by every exit pass.
struct SharedTerms {
    gate:       ScalarField,
    /// `w_wall·wall + w_ground·ground + w_mounted·mounted`
    background: ScalarField,
    /// Propagation speed for the exit distance passes.
    speed:      Option<ScalarField>,
}

impl FloorField {
    /// Compute the static field of every exit of `grid`.
    pub fn compute(grid: &Grid, params: &ScenarioParams) -> FieldResult<FloorField> {
        params.validate()?;
        let shared = SharedTerms::compute(grid, params);
        let exits: Vec<(ExitId, &CellMask)> = grid.exits().iter().map(|(&id, m)| (id, m)).collect();

        #[cfg(not(feature = "parallel"))]
        let fields: BTreeMap<ExitId, ScalarField> = exits
            .into_iter()
            .map(|(id, cells)| (id, exit_pass(grid, params, &shared, cells)))
            .collect();

        #[cfg(feature = "parallel")]
        let fields: BTreeMap<ExitId, ScalarField> = {
            use rayon::prelude::*;
            exits
                .into_par_iter()
                .map(|(id, cells)| (id, exit_pass(grid, params, &shared, cells)))
                .collect()
        };

        for (id, f) in &fields {
            log::debug!("floor field for {id}: max {:.4}", f.max_finite().unwrap_or(0.0));
        }
        Ok(FloorField { fields })
    }

    pub fn get(&self, exit: ExitId) -> FieldResult<&ScalarField> {
        self.fields.get(&exit).ok_or(FieldError::UnknownExit(exit))
    }

    pub fn exits(&self) -> impl Iterator<Item = ExitId> + '_ {
        self.fields.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl SharedTerms {
    fn compute(grid: &Grid, params: &ScenarioParams) -> SharedTerms {
        let w = &params.weights;
        let h = grid.cell_size();
        let walk = grid.traversable();
        let distance = |cells: &CellMask| fast_marching(cells, walk, None, h);

        let gate = if w.door == 0.0 {
            ScalarField::filled(grid.nx(), grid.ny(), 1.0)
        } else {
            distance(grid.entrance()).map(|d| w.door * params.door.inc(*d))
        };

        let wall = distance(grid.wall()).map(|d| params.wall.dec(*d));
        let ground_cells = grid.attraction_mask(AttractionKind::Ground);
        let mounted_cells = grid.attraction_mask(AttractionKind::Mounted);
        let ground = distance(&ground_cells).map(|d| params.attraction_ground.dec(*d));
        let mounted = distance(&mounted_cells).map(|d| params.attraction_mounted.dec(*d));

        let background = ScalarField::from_fn(grid.nx(), grid.ny(), |c| {
            w.wall * wall[c] + w.attraction_ground * ground[c] + w.attraction_mounted * mounted[c]
        });

        let speed = (params.attraction_speedup != 1.0).then(|| {
            let attracting = ground_cells.or(&mounted_cells);
            attracting.map(|a| if *a { params.attraction_speedup } else { 1.0 })
        });

        SharedTerms { gate, background, speed }
    }
}

/// Static field of one exit.
fn exit_pass(grid: &Grid, params: &ScenarioParams, shared: &SharedTerms, cells: &CellMask) -> ScalarField {
    let d = fast_marching(cells, grid.traversable(), shared.speed.as_ref(), grid.cell_size());
    let w_exit = params.weights.exit;
    ScalarField::from_fn(grid.nx(), grid.ny(), |c| {
        if !grid.is_traversable(c) {
            return 0.0;
        }
        shared.gate[c] * (shared.background[c] + w_exit * params.exit.dec(d[c]))
    })
}
