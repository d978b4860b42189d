use ca_core::{CaError, PedId};
use ca_field::FieldError;
use ca_geometry::GeometryError;
use ca_grid::{Cell, GridError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// Two pedestrians committed to the same cell.  Always a bug in the
    /// conflict resolver, never a scenario problem.
    #[error("occupancy violated at {cell}: {a} and {b}")]
    Occupancy {
        cell: Cell,
        a:    PedId,
        b:    PedId,
    },

    #[error("cell {0} is already occupied")]
    CellOccupied(Cell),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("field error: {0}")]
    Field(#[from] FieldError),

    #[error(transparent)]
    Core(#[from] CaError),
}

pub type SimResult<T> = Result<T, SimError>;
