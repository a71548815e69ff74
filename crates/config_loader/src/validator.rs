//! Scene validation
//!
//! Rules:
//! - world name non-empty, start_time finite
//! - step_size > 0, duration >= 0
//! - at most `MAX_TICKS` clock ticks
//! - topic_prefix, when given, starts with '/' and has no whitespace
//! - output name non-empty
//! - every sensor has a non-empty `name` and `type`
//! - sensor names unique
//! - `update_rate`, when given, is numeric (negative values are accepted and
//!   clamped to 0 when the sensor loads)

use std::collections::HashSet;

use contracts::{ConfigValue, ContractError, SceneBlueprint, SensorTable};

/// Upper bound on clock ticks per run.
pub const MAX_TICKS: u64 = 1_000_000_000;

/// Validate a parsed scene, returning the first problem found.
pub fn validate(blueprint: &SceneBlueprint) -> Result<(), ContractError> {
    validate_world(blueprint)?;
    validate_output(blueprint)?;
    validate_sensor_fields(blueprint)?;
    validate_sensor_names(blueprint)?;
    Ok(())
}

fn validate_world(blueprint: &SceneBlueprint) -> Result<(), ContractError> {
    let world = &blueprint.world;

    if world.name.trim().is_empty() {
        return Err(ContractError::config_validation(
            "world.name",
            "world name cannot be empty",
        ));
    }
    if !world.start_time.is_finite() {
        return Err(ContractError::config_validation(
            "world.start_time",
            format!("start_time must be finite, got {}", world.start_time),
        ));
    }
    if !(world.step_size.is_finite() && world.step_size > 0.0) {
        return Err(ContractError::config_validation(
            "world.step_size",
            format!("step_size must be > 0, got {}", world.step_size),
        ));
    }
    if !(world.duration.is_finite() && world.duration >= 0.0) {
        return Err(ContractError::config_validation(
            "world.duration",
            format!("duration must be >= 0, got {}", world.duration),
        ));
    }
    if world.tick_count() > MAX_TICKS {
        return Err(ContractError::config_validation(
            "world.duration",
            format!(
                "duration {} at step {} exceeds {MAX_TICKS} ticks",
                world.duration, world.step_size
            ),
        ));
    }
    if let Some(prefix) = &world.topic_prefix {
        if !prefix.starts_with('/') || prefix.chars().any(char::is_whitespace) {
            return Err(ContractError::config_validation(
                "world.topic_prefix",
                format!("'{prefix}' must start with '/' and contain no whitespace"),
            ));
        }
    }
    Ok(())
}

fn validate_output(blueprint: &SceneBlueprint) -> Result<(), ContractError> {
    if blueprint.output.name.trim().is_empty() {
        return Err(ContractError::config_validation(
            "output.name",
            "output name cannot be empty",
        ));
    }
    Ok(())
}

fn text_field(table: &SensorTable, key: &str) -> Option<String> {
    table
        .get(key)
        .and_then(ConfigValue::as_text)
        .filter(|v| !v.trim().is_empty())
}

fn validate_sensor_fields(blueprint: &SceneBlueprint) -> Result<(), ContractError> {
    for (idx, table) in blueprint.sensors.iter().enumerate() {
        let Some(name) = text_field(table, "name") else {
            return Err(ContractError::config_validation(
                format!("sensors[{idx}].name"),
                "sensor name is required",
            ));
        };

        if text_field(table, "type").is_none() {
            return Err(ContractError::config_validation(
                format!("sensors[{name}].type"),
                "sensor type is required",
            ));
        }

        if let Some(rate) = table.get("update_rate") {
            let numeric = match rate {
                ConfigValue::Integer(_) | ConfigValue::Float(_) => true,
                ConfigValue::Text(text) => text.trim().parse::<f64>().is_ok(),
                _ => false,
            };
            if !numeric {
                return Err(ContractError::config_validation(
                    format!("sensors[{name}].update_rate"),
                    format!("update_rate must be a number, got {rate:?}"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_sensor_names(blueprint: &SceneBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for name in blueprint.sensor_names() {
        if !seen.insert(name.clone()) {
            return Err(ContractError::config_validation(
                format!("sensors[name={name}]"),
                "duplicate sensor name",
            ));
        }
    }
    Ok(())
}
