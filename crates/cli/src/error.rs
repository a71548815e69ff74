//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// Scene file not found
    #[error("Scene file not found: {path}")]
    SceneNotFound { path: String },

    /// A sensor from the scene could not be created
    #[error("Failed to set up sensor '{sensor}': {source}")]
    SensorSetup {
        sensor: String,
        #[source]
        source: ContractError,
    },

    /// A command-line override is out of range
    #[error("Invalid override --{flag}: {message}")]
    InvalidOverride { flag: &'static str, message: String },
}

impl CliError {
    pub fn scene_not_found(path: impl Into<String>) -> Self {
        Self::SceneNotFound { path: path.into() }
    }

    pub fn sensor_setup(sensor: impl Into<String>, source: ContractError) -> Self {
        Self::SensorSetup {
            sensor: sensor.into(),
            source,
        }
    }

    pub fn invalid_override(flag: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOverride {
            flag,
            message: message.into(),
        }
    }
}
