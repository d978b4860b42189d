//! Field-generation error type.

use thiserror::Error;

use ca_core::{CaError, ExitId};

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("no floor field for exit {0}")]
    UnknownExit(ExitId),

    #[error("invalid scenario parameters: {0}")]
    Params(#[from] CaError),
}

pub type FieldResult<T> = Result<T, FieldError>;
