//! # Sensor Kinds
//!
//! Built-in mock sensor kinds: camera, lidar, imu, gnss and radar.
//!
//! Each kind is a [`MockGenerator`] that synthesizes a payload from the
//! sensor's pose and publishes it under the sensor topic. Timing is left
//! entirely to the scheduling core in the `sensors` crate.

pub mod builtin;
pub mod mock;
pub mod payload;

pub use builtin::register_builtin;
pub use mock::{MockConfig, MockGenerator, MAX_IMAGE_SIDE, MAX_LIDAR_POINTS, MAX_RADAR_DETECTIONS};
