//! `ca-geometry` — the continuous floor plan behind the automaton grid.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`polygon`]      | `Polygon` (area, containment, half-plane/convex clipping) |
//! | [`floor`]        | `Geometry`, `GeometryBuilder`, `Entrance`, `Attraction`   |
//! | [`visibility`]   | angular-sweep visibility polygon                          |
//! | [`voronoi`]      | bounded Voronoi cells of a small seed set                 |
//! | [`intersection`] | `Intersection` variant (visible ∩ Voronoi)                |
//! | [`error`]        | `GeometryError`, `GeometryResult<T>`                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the builder and shapes.  |

pub mod error;
pub mod floor;
pub mod intersection;
pub mod polygon;
pub mod visibility;
pub mod voronoi;


pub use error::{GeometryError, GeometryResult};
pub use floor::{Attraction, AttractionKind, Entrance, Geometry, GeometryBuilder};
pub use intersection::Intersection;
pub use polygon::Polygon;
pub use visibility::visibility_polygon;
pub use voronoi::voronoi_cells;
