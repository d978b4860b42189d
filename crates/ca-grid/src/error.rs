//! Grid-construction error type.

use thiserror::Error;

use ca_core::ExitId;

/// Errors produced by [`Grid::build`](crate::Grid::build).  All fatal: no
/// partially classified lattice is ever returned.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell size must be finite and > 0, got {0}")]
    InvalidCellSize(f64),

    #[error("floor plan bounding box has zero area")]
    DegenerateGeometry,

    #[error("no traversable cells at cell size {0} mm")]
    NoTraversableCells(f64),

    #[error("exit {0} does not touch any cell")]
    ExitOffGrid(ExitId),
}

pub type GridResult<T> = Result<T, GridError>;
