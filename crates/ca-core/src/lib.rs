//! `ca-core` — foundational types for the waiting-room pedestrian cellular
//! automaton.
//!
//! This crate is a dependency of every other `ca-*` crate.  It intentionally
//! has no `ca-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `PedId`, `ExitId`, `EntranceId`, `AttractionId`           |
//! | [`geo`]         | `Point`, `Segment`, `BBox` (millimetre plane coordinates) |
//! | [`neighbor`]    | `Neighbor` keys, `NeighborMap<T>`                         |
//! | [`params`]      | `Logistic`, `Weights`, `ScenarioParams`, `Aggregation`    |
//! | [`time`]        | `Step`, `SimConfig`                                       |
//! | [`rng`]         | `PedRng` (per-pedestrian), `SimRng` (global)              |
//! | [`error`]       | `CaError`, `CaResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod neighbor;
pub mod params;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CaError, CaResult};
pub use geo::{BBox, Point, Segment};
pub use ids::{AttractionId, EntranceId, ExitId, PedId};
pub use neighbor::{Neighbor, NeighborMap};
pub use params::{Aggregation, Logistic, ScenarioParams, Weights};
pub use rng::{PedRng, SimRng};
pub use time::{SimConfig, Step};

/// Millimetres per metre.  All plane coordinates are millimetres; the
/// logistic shaping functions take metres.
pub const MM_PER_M: f64 = 1000.0;

/// Default edge length of one automaton cell, in millimetres.
pub const DEFAULT_CELL_SIZE: f64 = 0.5 * MM_PER_M;
