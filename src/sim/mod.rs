//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per `Session::tick`, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod config;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::autopilot;
pub use collision::{Bounds, evaluate, hits_pipe, out_of_bounds};
pub use config::{ConfigError, SimConfig};
pub use spawner::SpawnTimer;
pub use state::{EndReason, Fish, Pipe, PipeSet, Session, SessionStatus};
pub use tick::{InputEvent, PipeView, Snapshot};
