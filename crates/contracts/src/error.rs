//! Layered error definitions
//!
//! Categorized by source: config / binding / registry / publish

use thiserror::Error;

use crate::SensorId;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Required field absent from a configuration element
    #[error("missing required field '{field}' in <{element}>")]
    MissingField { element: String, field: String },

    /// Field present but its value cannot be used
    #[error("malformed field '{field}' = {value:?}: {message}")]
    MalformedField {
        field: String,
        value: String,
        message: String,
    },

    // ===== Binding Errors =====
    /// Sensor already carries an identifier from an earlier bind
    #[error("sensor '{name}' is already bound as {existing}")]
    AlreadyBound { name: String, existing: SensorId },

    /// Bind attempted with the unbound sentinel
    #[error("cannot bind sensor '{name}' to the unbound sentinel id")]
    SentinelId { name: String },

    // ===== Registry Errors =====
    /// No factory registered for a sensor type
    #[error("unknown sensor type '{sensor_type}'")]
    UnknownSensorType { sensor_type: String },

    // ===== Publish Errors =====
    /// Publisher rejected a packet
    #[error("publisher '{publisher}' failed on topic '{topic}': {message}")]
    Publish {
        publisher: String,
        topic: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create missing field error
    pub fn missing_field(element: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            element: element.into(),
            field: field.into(),
        }
    }

    /// Create malformed field error
    pub fn malformed_field(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedField {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create publish error
    pub fn publish(
        publisher: impl Into<String>,
        topic: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Publish {
            publisher: publisher.into(),
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while reading or checking configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. }
                | Self::ConfigValidation { .. }
                | Self::MissingField { .. }
                | Self::MalformedField { .. }
                | Self::UnknownSensorType { .. }
        )
    }
}
