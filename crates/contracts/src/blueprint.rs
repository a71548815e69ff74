//! SceneBlueprint - Config Loader output
//!
//! Describes a complete simulation run: world clock settings, output
//! routing, and the raw sensor descriptions handed to the manager.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ConfigValue, ElementNode, SimTime, EPOCH};

/// Keys of a sensor table that become element attributes instead of children.
pub const SENSOR_ATTRIBUTE_KEYS: [&str; 2] = ["name", "type"];

/// Tag of a sensor description element.
pub const SENSOR_ELEMENT: &str = "sensor";

/// Raw sensor description as written in the scene file.
pub type SensorTable = BTreeMap<String, ConfigValue>;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete scene blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// World clock settings
    #[serde(default)]
    pub world: WorldConfig,

    /// Output routing
    #[serde(default)]
    pub output: OutputConfig,

    /// Sensor descriptions, kept loosely typed until a sensor loads them
    #[serde(default)]
    pub sensors: Vec<SensorTable>,
}

/// World clock settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// World name, also used as the manager name
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Simulation time of the first tick (seconds)
    #[serde(default)]
    pub start_time: SimTime,

    /// Simulation time between ticks (seconds), must be > 0
    #[serde(default = "default_step_size")]
    pub step_size: f64,

    /// Simulated span after `start_time` (seconds), must be >= 0
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// Prefix prepended to every sensor topic at publish time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_prefix: Option<String>,
}

fn default_world_name() -> String {
    "default".to_string()
}

fn default_step_size() -> f64 {
    0.01
}

fn default_duration() -> f64 {
    10.0
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            start_time: EPOCH,
            step_size: default_step_size(),
            duration: default_duration(),
            topic_prefix: None,
        }
    }
}

impl WorldConfig {
    /// Number of ticks from `start_time` to `start_time + duration`, both ends included.
    pub fn tick_count(&self) -> u64 {
        if self.step_size <= 0.0 || self.duration < 0.0 {
            return 0;
        }
        // Tolerate representation error so 1.0 / 0.1 still counts ten steps.
        // The float cast saturates; the add must too.
        ((self.duration / self.step_size + 1e-9).floor() as u64).saturating_add(1)
    }

    /// Simulation time of tick `index`, computed without accumulating error.
    pub fn tick_time(&self, index: u64) -> SimTime {
        self.start_time + index as f64 * self.step_size
    }
}

/// Output routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Publisher name
    #[serde(default = "default_output_name")]
    pub name: String,

    /// Publisher kind
    #[serde(default)]
    pub kind: OutputKind,
}

fn default_output_name() -> String {
    "output".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            name: default_output_name(),
            kind: OutputKind::default(),
        }
    }
}

/// Publisher kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Log packet summaries
    #[default]
    Log,
    /// Keep packets in memory
    Memory,
    /// Discard packets
    None,
}

impl SceneBlueprint {
    /// Sensor descriptions as configuration elements, in file order.
    pub fn sensor_elements(&self) -> Vec<ElementNode> {
        self.sensors
            .iter()
            .map(|table| ElementNode::from_table(SENSOR_ELEMENT, table, &SENSOR_ATTRIBUTE_KEYS))
            .collect()
    }

    /// Declared sensor names, skipping tables without a textual name.
    pub fn sensor_names(&self) -> Vec<String> {
        self.sensors
            .iter()
            .filter_map(|table| table.get("name").and_then(ConfigValue::as_text))
            .collect()
    }
}
