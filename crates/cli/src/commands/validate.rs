//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{SceneBlueprint, ConfigValue};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::simulation::{Simulation, SimulationConfig};

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SceneSummary>,
}

#[derive(Serialize)]
struct SceneSummary {
    world: String,
    ticks: u64,
    sensor_count: usize,
    output: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating scene");

    let result = validate_scene(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Scene validation failed")
    }
}

fn invalid(config_path: String, error: String) -> ValidationResult {
    ValidationResult {
        valid: false,
        config_path,
        error: Some(error),
        warnings: Vec::new(),
        summary: None,
    }
}

fn validate_scene(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        let error = format!("File not found: {config_path}");
        return invalid(config_path, error);
    }

    let blueprint = match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => blueprint,
        Err(e) => return invalid(config_path, e.to_string()),
    };

    let warnings = collect_warnings(&blueprint);
    let summary = SceneSummary {
        world: blueprint.world.name.clone(),
        ticks: blueprint.world.tick_count(),
        sensor_count: blueprint.sensors.len(),
        output: format!("{:?}", blueprint.output.kind),
    };

    // Loading every sensor catches what the schema check cannot:
    // unknown types, bad topics, malformed poses.
    let built = Simulation::build(SimulationConfig {
        blueprint,
        force_every: None,
        rewind_after: None,
    });
    if let Err(e) = built {
        return invalid(config_path, e.to_string());
    }

    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings,
        summary: Some(summary),
    }
}

/// Non-fatal issues
fn collect_warnings(blueprint: &SceneBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.sensors.is_empty() {
        warnings.push("No sensors configured".to_string());
    }

    for table in &blueprint.sensors {
        let name = table
            .get("name")
            .and_then(ConfigValue::as_text)
            .unwrap_or_default();
        let rate = table
            .get("update_rate")
            .and_then(ConfigValue::as_text)
            .and_then(|text| text.trim().parse::<f64>().ok());

        match rate {
            None => warnings.push(format!(
                "Sensor '{name}' has no update_rate and will update on every tick"
            )),
            Some(rate) if rate < 0.0 => warnings.push(format!(
                "Sensor '{name}' has negative update_rate {rate}, treated as 0"
            )),
            Some(rate) if rate > 0.0 && 1.0 / rate < blueprint.world.step_size => {
                warnings.push(format!(
                    "Sensor '{name}' runs at {rate} Hz, faster than the clock step of {}s",
                    blueprint.world.step_size
                ))
            }
            _ => {}
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("OK  Scene is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  World: {}", summary.world);
            println!("  Ticks: {}", summary.ticks);
            println!("  Sensors: {}", summary.sensor_count);
            println!("  Output: {}", summary.output);
        }

        if !result.warnings.is_empty() {
            println!("\nWarnings:");
            for warning in &result.warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("ERR Scene is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
