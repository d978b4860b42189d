//! `ca-grid` — the regular lattice the automaton runs on.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                     |
//! |-----------|--------------------------------------------------------------|
//! | [`cell`]  | `Cell` index pair and its von Neumann arithmetic             |
//! | [`field`] | `Field<T>`, `ScalarField`, `CellMask` (column-major 2-D arrays) |
//! | [`grid`]  | `Grid::build`, membership masks, `neighbors`, `coordinates`  |
//! | [`error`] | `GridError`, `GridResult<T>`                                 |
//!
//! # Coordinates
//!
//! Cell `(i, j)` has its centre at
//!
//! ```text
//! (min_x − cell_size + i · cell_size,  min_y − cell_size + j · cell_size)
//! ```
//!
//! where `min_x, min_y` are the floor plan's bounding-box minimum.  The one
//! cell of margin on every side keeps boundary, exit and entrance cells
//! inside the lattice.

pub mod cell;
pub mod error;
pub mod field;
pub mod grid;

#[cfg(test)]
mod tests;

pub use cell::Cell;
pub use error::{GridError, GridResult};
pub use field::{CellMask, Field, ScalarField};
pub use grid::Grid;
