//! Geometry-subsystem error type.

use thiserror::Error;

use ca_core::{CaError, EntranceId};

/// Errors produced by `ca-geometry`.  All of them are construction-time
/// configuration errors.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{what} needs at least 3 vertices, got {got}")]
    TooFewVertices { what: &'static str, got: usize },

    #[error("{what} has zero area")]
    ZeroArea { what: &'static str },

    #[error("obstacle {0} is not inside the floor boundary")]
    HoleOutsideFloor(usize),

    #[error("floor plan has no exits")]
    NoExits,

    #[error("entrance {id}: {reason}")]
    InvalidEntrance { id: EntranceId, reason: String },

    #[error("non-finite coordinate in {what}")]
    NonFinite { what: &'static str },

    #[error(transparent)]
    Core(#[from] CaError),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
