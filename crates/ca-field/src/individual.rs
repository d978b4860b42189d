//! Per-pedestrian repulsion field and the combined decision field.

use ca_core::Logistic;
use ca_grid::{Cell, CellMask, Grid, ScalarField};

use crate::fmm::fast_marching;

/// Repulsion from the cells in `others` (every pedestrian except the one
/// deciding), shaped with `ped.inc`: further from others is better.
///
/// With nobody else on the floor the field is `1` everywhere.
pub fn individual_field<I>(grid: &Grid, others: I, ped: Logistic) -> ScalarField
where
    I: IntoIterator<Item = Cell>,
{
    let (nx, ny) = grid.dims();
    let mut occupied = CellMask::filled(nx, ny, false);
    let mut any = false;
    for c in others {
        if grid.in_bounds(c) {
            occupied[c] = true;
            any = true;
        }
    }
    if !any {
        return ScalarField::filled(nx, ny, 1.0);
    }
    fast_marching(&occupied, grid.traversable(), None, grid.cell_size()).map(|d| ped.inc(*d))
}

/// `static × individual`, elementwise.
pub fn combine(static_field: &ScalarField, individual: &ScalarField) -> ScalarField {
    static_field.zip_map(individual, |s, i| s * i)
}
