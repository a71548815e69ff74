//! Simulation driver: a fixed-step clock around the sensor manager.

mod driver;
mod stats;

pub use driver::{SensorInfo, Simulation, SimulationConfig};
pub use stats::RunStats;
