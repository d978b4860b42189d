//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CaError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::PedId;

/// The top-level error type for `ca-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CaError {
    #[error("pedestrian {0} not found")]
    PedestrianNotFound(PedId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ca-core`.
pub type CaResult<T> = Result<T, CaError>;
