//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Simulation time is seconds as `f64` (`SimTime`), starting at `EPOCH`
//! - The clock may pause, jump, or be reset; nothing here assumes wall-clock pacing

mod blueprint;
mod element;
mod error;
mod pose;
mod publisher;
mod sensor;
mod sensor_id;

pub use blueprint::*;
pub use element::{ConfigElement, ConfigValue, ElementNode};
pub use error::*;
pub use pose::{format_pose, parse_pose, Pose};
pub use publisher::{Publisher, SharedPublisher};
pub use sensor::*;
pub use sensor_id::{SensorId, NO_SENSOR};

/// Simulation timestamp in seconds.
pub type SimTime = f64;

/// Start of simulation time.
pub const EPOCH: SimTime = 0.0;
