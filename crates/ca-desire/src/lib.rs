//! `ca-desire` — where does a pedestrian want to step next?
//!
//! Turns the combined scalar field into a probability over the pedestrian's
//! reachable neighbor keys.
//!
//! # Algorithm
//!
//! 1. Visible region from the pedestrian's cell centre.
//! 2. Voronoi cells seeded at every reachable neighbor centre (self
//!    included), bounded by far dummy seeds.
//! 3. For each non-self key: visible ∩ Voronoi cell.  Empty → weight 0.
//!    Otherwise aggregate `field · dec(distance)` over the visible
//!    traversable cells nearest to that key's centre ([`Aggregation::Max`]
//!    or `Mean`).  A cell equidistant from two keys counts for both.
//! 4. Self: the field value at the pedestrian's own cell.
//! 5. Optional direction persistence: multiply by the row of
//!    [`PERSISTENCE`] for the last movement, normalised over present keys.
//! 6. Normalise.  All-zero or non-finite sums fall back to uniform.
//!
//! | Module    | Contents                                          |
//! |-----------|---------------------------------------------------|
//! | [`model`] | `DesireModel`, `normalize`                        |
//! | [`prior`] | `PERSISTENCE` table, `persistence_weights`        |
//!
//! [`Aggregation::Max`]: ca_core::Aggregation::Max

pub mod model;
pub mod prior;

#[cfg(test)]
mod tests;

pub use model::{DesireModel, normalize};
pub use prior::{PERSISTENCE, persistence_weights};
