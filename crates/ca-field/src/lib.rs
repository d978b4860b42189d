//! `ca-field` — scalar desirability fields over the grid.
//!
//! # Pipeline
//!
//! ```text
//! feature cells ──fast marching──▶ distance (mm) ──logistic──▶ [0, 1]
//! ```
//!
//! | Field        | Sources                         | Shaping   | Lifetime          |
//! |--------------|---------------------------------|-----------|-------------------|
//! | entrance     | entrance cells                  | `inc`     | per run (gate)    |
//! | wall         | wall cells                      | `dec`     | per run           |
//! | exit `e`     | cells of exit `e`               | `dec`     | per run, per exit |
//! | attraction   | ground / mounted region cells   | `dec`     | per run           |
//! | individual   | other pedestrians' cells        | `inc`     | per pedestrian per step |
//!
//! The static field of exit `e` is
//!
//! ```text
//! gate · (w_wall·wall + w_exit·exit_e + w_ground·ground + w_mounted·mounted)
//! ```
//!
//! with `gate = w_door · entrance`, or `1` when `w_door = 0`.  The field a
//! pedestrian decides on is `static[exit] × individual`.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `parallel` | Per-exit static passes run on Rayon's thread pool.   |

pub mod error;
pub mod fmm;
pub mod individual;
pub mod static_field;


pub use error::{FieldError, FieldResult};
pub use fmm::fast_marching;
pub use individual::{combine, individual_field};
pub use static_field::FloorField;
