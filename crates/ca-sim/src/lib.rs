//! `ca-sim` — step loop orchestrator for the waiting-room pedestrian cellular
//! automaton.
//!
//! # Step loop
//!
//! ```text
//! for step in 0..config.total_steps:
//!   ① Injection — entrances due this step place new pedestrians on free
//!                 entrance cells (bounded by max_pedestrians).
//!   ② Intents   — each pedestrian draws a neighbor key from
//!                 DesireModel::probabilities over static × individual
//!                 (parallel with the `parallel` feature).
//!   ③ Resolve   — per-target lottery, then cascade hold-backs.
//!   ④ Commit    — positions, directions, not-moving counters; occupancy
//!                 checked.
//!   ⑤ Exit      — optional removal of pedestrians at their exit.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Intent phase, floor-field passes and batch jobs on Rayon.  |
//! | `fx-hash`  | FxHash for the cell occupancy index.                       |
//! | `serde`    | `Serialize`/`Deserialize` on `Pedestrian` and `Placement`. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ca_core::{ScenarioParams, SimConfig};
//! use ca_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), geometry, ScenarioParams::default())
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod batch;
pub mod builder;
pub mod conflict;
pub mod error;
pub mod observer;
pub mod pedestrian;
pub mod sim;


pub use batch::{BatchJob, run_batch};
pub use builder::{Placement, SimBuilder};
pub use conflict::{Proposal, Resolution, STAY_WEIGHT, resolve};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use pedestrian::{Pedestrian, PedestrianRngs, PedestrianStore};
pub use sim::{Sim, StepReport};
