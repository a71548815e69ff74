//! Mock generator
//!
//! One generator type covers every built-in kind; the kind only changes the
//! payload shape. Optional `<sensor>` children:
//!
//! | child            | kinds  | default | range |
//! |------------------|--------|---------|-------|
//! | `image_width`    | camera | 800     | 1..=16384 |
//! | `image_height`   | camera | 600     | 1..=16384 |
//! | `lidar_points`   | lidar  | 10000   | 1..=4000000 |
//! | `radar_detections` | radar | 5      | 0..=100000 |
//! | `origin`         | gnss   | `40.0 -74.0 100.0` (lat lon alt) | |
//! | `dropout_every`  | all    | off     | |
//!
//! `dropout_every = n` makes every n-th generation attempt report no data,
//! which exercises the retry path of the scheduler.

use contracts::{
    ConfigElement, ContractError, SensorPacket, SensorType, SharedPublisher, SimTime,
};
use sensors::{DataGenerator, GenerationError, SensorContext};
use tracing::trace;

use crate::payload;

pub const MAX_IMAGE_SIDE: u32 = 16_384;
pub const MAX_LIDAR_POINTS: u32 = 4_000_000;
pub const MAX_RADAR_DETECTIONS: u32 = 100_000;

/// Mock sensor configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MockConfig {
    pub image_width: u32,
    pub image_height: u32,
    pub lidar_points: u32,
    pub radar_detections: u32,
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub origin_altitude: f64,
    /// Fail every n-th attempt
    pub dropout_every: Option<u64>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            image_width: 800,
            image_height: 600,
            lidar_points: 10_000,
            radar_detections: 5,
            origin_latitude: 40.0,
            origin_longitude: -74.0,
            origin_altitude: 100.0,
            dropout_every: None,
        }
    }
}

impl MockConfig {
    /// Read overrides from a `<sensor>` element, keeping defaults for absent children.
    pub fn from_element(element: &dyn ConfigElement) -> Result<Self, ContractError> {
        let defaults = Self::default();

        let config = Self {
            image_width: in_range(element, "image_width", defaults.image_width, 1, MAX_IMAGE_SIDE)?,
            image_height: in_range(element, "image_height", defaults.image_height, 1, MAX_IMAGE_SIDE)?,
            lidar_points: in_range(element, "lidar_points", defaults.lidar_points, 1, MAX_LIDAR_POINTS)?,
            radar_detections: in_range(
                element,
                "radar_detections",
                defaults.radar_detections,
                0,
                MAX_RADAR_DETECTIONS,
            )?,
            dropout_every: element.get::<u64>("dropout_every")?.filter(|n| *n > 0),
            ..defaults
        };

        match element.child_text("origin") {
            None => Ok(config),
            Some(text) => {
                let values = text
                    .split_whitespace()
                    .map(str::parse::<f64>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| ContractError::malformed_field("origin", text, e.to_string()))?;
                let [lat, lon, alt] = values.as_slice() else {
                    return Err(ContractError::malformed_field(
                        "origin",
                        text,
                        "expected 3 values (latitude longitude altitude)",
                    ));
                };
                Ok(Self {
                    origin_latitude: *lat,
                    origin_longitude: *lon,
                    origin_altitude: *alt,
                    ..config
                })
            }
        }
    }
}

fn in_range(
    element: &dyn ConfigElement,
    name: &str,
    default: u32,
    min: u32,
    max: u32,
) -> Result<u32, ContractError> {
    let value = element.get_or(name, default)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ContractError::malformed_field(
            name,
            value.to_string(),
            format!("must be between {min} and {max}"),
        ))
    }
}

/// Synthesizes a payload per call and publishes it on the sensor topic.
pub struct MockGenerator {
    sensor_type: SensorType,
    config: MockConfig,
    publisher: SharedPublisher,
    attempts: u64,
    frame_id: u64,
}

impl MockGenerator {
    pub fn new(sensor_type: SensorType, publisher: SharedPublisher) -> Self {
        Self {
            sensor_type,
            config: MockConfig::default(),
            publisher,
            attempts: 0,
            frame_id: 0,
        }
    }

    pub fn with_config(mut self, config: MockConfig) -> Self {
        self.config = config;
        self
    }

}

impl DataGenerator for MockGenerator {
    fn kind(&self) -> &str {
        self.sensor_type.as_str()
    }

    fn load(&mut self, element: &dyn ConfigElement) -> Result<(), ContractError> {
        self.config = MockConfig::from_element(element)?;
        Ok(())
    }

    fn generate(&mut self, now: SimTime, sensor: &SensorContext<'_>) -> Result<(), GenerationError> {
        self.attempts += 1;
        if let Some(every) = self.config.dropout_every {
            if self.attempts % every == 0 {
                return Err(GenerationError::no_data(format!(
                    "simulated dropout on attempt {}",
                    self.attempts
                )));
            }
        }

        let frame_id = self.frame_id + 1;
        let packet = SensorPacket {
            sensor_id: sensor.id(),
            sensor_name: sensor.name().to_string(),
            sensor_type: self.sensor_type,
            timestamp: now,
            frame_id,
            payload: payload::build(self.sensor_type, &self.config, sensor.pose(), frame_id),
        };

        let topic = sensor.qualified_topic();
        self.publisher.publish(&topic, packet)?;
        self.frame_id = frame_id;

        trace!(sensor = %sensor.name(), topic = %topic, frame_id, now, "mock packet published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ElementNode;
    use publishers::MemoryPublisher;
    use sensors::{Sensor, UpdateOutcome};
    use std::sync::Arc;

    fn sensor_with(
        sensor_type: SensorType,
        element: ElementNode,
    ) -> (Sensor, Arc<MemoryPublisher>) {
        let publisher = Arc::new(MemoryPublisher::new("mem"));
        let mut sensor = Sensor::new(MockGenerator::new(sensor_type, publisher.clone()));
        sensor.load(&element).unwrap();
        (sensor, publisher)
    }

    #[test]
    fn test_config_from_element() {
        let element = ElementNode::new("sensor")
            .with_child_text("image_width", "64")
            .with_child_text("dropout_every", "3")
            .with_child_text("origin", "10 20 30");
        let config = MockConfig::from_element(&element).unwrap();

        assert_eq!(config.image_width, 64);
        assert_eq!(config.image_height, 600);
        assert_eq!(config.dropout_every, Some(3));
        assert_eq!(config.origin_longitude, 20.0);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        for (child, value) in [
            ("image_width", "0"),
            ("lidar_points", "many"),
            ("origin", "1 2"),
        ] {
            let element = ElementNode::new("sensor").with_child_text(child, value);
            let err = MockConfig::from_element(&element).unwrap_err();
            assert!(err.to_string().contains(child), "got: {err}");
        }
    }

    #[test]
    fn test_config_size_limits() {
        let at_limit = ElementNode::new("sensor")
            .with_child_text("lidar_points", MAX_LIDAR_POINTS.to_string())
            .with_child_text("radar_detections", "0");
        let config = MockConfig::from_element(&at_limit).unwrap();
        assert_eq!(config.lidar_points, MAX_LIDAR_POINTS);
        assert_eq!(config.radar_detections, 0);

        for (child, value) in [
            ("lidar_points", "300000000"),
            ("radar_detections", "300000000"),
            ("image_width", "16385"),
        ] {
            let element = ElementNode::new("sensor").with_child_text(child, value);
            let err = MockConfig::from_element(&element).unwrap_err();
            assert!(matches!(err, ContractError::MalformedField { .. }));
            assert!(err.to_string().contains(child), "got: {err}");
        }
    }

    #[test]
    fn test_generate_publishes_on_topic() {
        let element = ElementNode::new("sensor")
            .with_attribute("name", "front")
            .with_child_text("update_rate", "4")
            .with_child_text("image_width", "2")
            .with_child_text("image_height", "2");
        let (mut sensor, publisher) = sensor_with(SensorType::Camera, element);

        assert_eq!(sensor.scheduled_update(0.0), UpdateOutcome::Updated);
        assert_eq!(sensor.scheduled_update(0.125), UpdateOutcome::NotDue);
        assert_eq!(sensor.scheduled_update(0.25), UpdateOutcome::Updated);

        let packets = publisher.packets_on("/sensors/front");
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[1].frame_id, 2);
        assert_eq!(packets[1].timestamp, 0.25);
        assert_eq!(packets[0].payload.byte_len(), 16);
    }

    #[test]
    fn test_dropout_triggers_retry() {
        let element = ElementNode::new("sensor")
            .with_attribute("name", "imu")
            .with_child_text("update_rate", "4")
            .with_child_text("dropout_every", "2");
        let (mut sensor, publisher) = sensor_with(SensorType::Imu, element);

        assert_eq!(sensor.scheduled_update(0.0), UpdateOutcome::Updated);
        assert_eq!(sensor.scheduled_update(0.25), UpdateOutcome::Failed);
        assert_eq!(sensor.next_update_time(), 0.25);
        assert_eq!(sensor.scheduled_update(0.25), UpdateOutcome::Updated);
        assert_eq!(sensor.next_update_time(), 0.5);
        assert_eq!(publisher.len(), 2);
    }

    #[test]
    fn test_publish_failure_keeps_schedule() {
        let publisher = Arc::new(MemoryPublisher::bounded("mem", 1));
        let mut sensor = Sensor::new(MockGenerator::new(SensorType::Gnss, publisher.clone()));
        sensor
            .load(
                &ElementNode::new("sensor")
                    .with_attribute("name", "gps")
                    .with_child_text("update_rate", "2"),
            )
            .unwrap();

        assert!(sensor.scheduled_update(0.0).is_updated());
        assert_eq!(sensor.scheduled_update(0.5), UpdateOutcome::Failed);
        assert_eq!(sensor.next_update_time(), 0.5);
        assert_eq!(publisher.stats().failures(), 1);
    }
}
