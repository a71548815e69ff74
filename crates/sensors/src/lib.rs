//! # Sensors
//!
//! Update-scheduling core shared by every simulated sensor.
//!
//! Responsibilities:
//! - Decide *when* a sensor generates data as simulation time advances
//! - Keep the per-sensor schedule (rate, last/next update time)
//! - Run forced updates without disturbing that schedule
//! - Bind sensors to their manager exactly once
//! - Extract name, topic, rate and pose from configuration elements
//!
//! What a sensor produces is left to a [`DataGenerator`].
//!
//! # Example
//!
//! ```
//! use contracts::{ElementNode, SimTime};
//! use sensors::{DataGenerator, GenerationError, Manager, SensorContext};
//!
//! struct Ticker;
//!
//! impl DataGenerator for Ticker {
//!     fn kind(&self) -> &str {
//!         "ticker"
//!     }
//!
//!     fn generate(&mut self, _now: SimTime, _sensor: &SensorContext<'_>) -> Result<(), GenerationError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut manager = Manager::new("demo");
//! manager.registry_mut().register("ticker", |_| Ok(Box::new(Ticker)));
//!
//! let element = ElementNode::new("sensor")
//!     .with_attribute("name", "tick")
//!     .with_attribute("type", "ticker")
//!     .with_child_text("update_rate", "10");
//! let id = manager.create_sensor(&element).unwrap();
//!
//! let summary = manager.run_once(0.0, false);
//! assert_eq!(summary.updated, 1);
//! assert!((manager.sensor(id).unwrap().next_update_time() - 0.1).abs() < 1e-12);
//! ```

pub mod generator;
pub mod manager;
pub mod registry;
pub mod schedule;
pub mod sensor;
pub mod state;

pub use contracts::{SensorId, SimTime, NO_SENSOR};
pub use generator::{DataGenerator, GenerationError, SensorContext};
pub use manager::{Manager, ManagerHandle, RunSummary};
pub use registry::{GeneratorFactory, SensorRegistry};
pub use sensor::{Sensor, UpdateOutcome};
pub use state::SensorState;
