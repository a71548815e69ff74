//! Registration of the built-in kinds

use contracts::{SensorType, SharedPublisher};
use sensors::SensorRegistry;

use crate::mock::MockGenerator;

/// Register a mock generator for every [`SensorType`], all writing to `publisher`.
pub fn register_builtin(registry: &mut SensorRegistry, publisher: SharedPublisher) {
    for sensor_type in SensorType::ALL {
        let publisher = publisher.clone();
        registry.register(sensor_type.as_str(), move |_| {
            Ok(Box::new(MockGenerator::new(sensor_type, publisher.clone())))
        });
    }
}
