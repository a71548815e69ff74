//! Sensor kind registry
//!
//! Maps the `type` attribute of a `<sensor>` element to a factory that builds
//! the matching [`DataGenerator`].

use std::collections::BTreeMap;

use contracts::{ConfigElement, ContractError};

use crate::generator::DataGenerator;

/// Builds a generator for one sensor kind.
pub type GeneratorFactory =
    Box<dyn Fn(&dyn ConfigElement) -> Result<Box<dyn DataGenerator>, ContractError>>;

/// Type name -> factory lookup.
#[derive(Default)]
pub struct SensorRegistry {
    factories: BTreeMap<String, GeneratorFactory>,
}

impl std::fmt::Debug for SensorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory; a later registration for the same type wins.
    pub fn register<F>(&mut self, sensor_type: impl Into<String>, factory: F)
    where
        F: Fn(&dyn ConfigElement) -> Result<Box<dyn DataGenerator>, ContractError> + 'static,
    {
        let sensor_type = sensor_type.into();
        if self
            .factories
            .insert(sensor_type.clone(), Box::new(factory))
            .is_some()
        {
            tracing::debug!(sensor_type = %sensor_type, "sensor factory replaced");
        }
    }

    pub fn contains(&self, sensor_type: &str) -> bool {
        self.factories.contains_key(sensor_type)
    }

    /// Registered type names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Build a generator for `sensor_type`.
    ///
    /// # Errors
    /// `UnknownSensorType` if nothing is registered under that name, or the
    /// factory's own error.
    pub fn create(
        &self,
        sensor_type: &str,
        element: &dyn ConfigElement,
    ) -> Result<Box<dyn DataGenerator>, ContractError> {
        let factory = self
            .factories
            .get(sensor_type)
            .ok_or_else(|| ContractError::UnknownSensorType {
                sensor_type: sensor_type.to_string(),
            })?;
        factory(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GenerationError, SensorContext};
    use contracts::{ElementNode, SimTime};

    struct Noop(&'static str);

    impl DataGenerator for Noop {
        fn kind(&self) -> &str {
            self.0
        }

        fn generate(&mut self, _now: SimTime, _sensor: &SensorContext<'_>) -> Result<(), GenerationError> {
            Ok(())
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = SensorRegistry::new();
        registry.register("camera", |_| Ok(Box::new(Noop("camera"))));
        registry.register("imu", |_| Ok(Box::new(Noop("imu"))));

        assert!(registry.contains("camera"));
        assert_eq!(registry.kinds(), vec!["camera", "imu"]);

        let element = ElementNode::new("sensor");
        let generator = registry.create("imu", &element).unwrap();
        assert_eq!(generator.kind(), "imu");
    }

    #[test]
    fn test_unknown_type() {
        let registry = SensorRegistry::new();
        let err = registry
            .create("sonar", &ElementNode::new("sensor"))
            .err()
            .unwrap();
        assert!(matches!(err, ContractError::UnknownSensorType { .. }));
        assert!(err.to_string().contains("sonar"));
    }

    #[test]
    fn test_factory_error_propagates() {
        let mut registry = SensorRegistry::new();
        registry.register("camera", |_| {
            Err(ContractError::config_validation("camera", "unsupported"))
        });
        assert!(registry.create("camera", &ElementNode::new("sensor")).is_err());
    }
}
