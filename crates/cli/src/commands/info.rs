//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::SceneBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;
use crate::simulation::{SensorInfo, Simulation, SimulationConfig};

/// Scene info for JSON output
#[derive(Serialize)]
struct SceneInfo {
    version: String,
    world: WorldInfo,
    output: OutputInfo,
    sensors: Vec<SensorInfo>,
}

#[derive(Serialize)]
struct WorldInfo {
    name: String,
    start_time: f64,
    step_size: f64,
    duration: f64,
    ticks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic_prefix: Option<String>,
}

#[derive(Serialize)]
struct OutputInfo {
    name: String,
    kind: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading scene info");

    if !args.config.exists() {
        return Err(CliError::scene_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load scene from {}", args.config.display()))?;
    let info = build_scene_info(blueprint)?;

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize scene info")?;
        println!("{json}");
    } else {
        print_scene_info(&info);
    }

    Ok(())
}

fn build_scene_info(blueprint: SceneBlueprint) -> Result<SceneInfo> {
    let world = &blueprint.world;
    let world_info = WorldInfo {
        name: world.name.clone(),
        start_time: world.start_time,
        step_size: world.step_size,
        duration: world.duration,
        ticks: world.tick_count(),
        topic_prefix: world.topic_prefix.clone(),
    };
    let output = OutputInfo {
        name: blueprint.output.name.clone(),
        kind: format!("{:?}", blueprint.output.kind).to_lowercase(),
    };
    let version = format!("{:?}", blueprint.version);

    let simulation = Simulation::build(SimulationConfig {
        blueprint,
        force_every: None,
        rewind_after: None,
    })?;

    Ok(SceneInfo {
        version,
        world: world_info,
        output,
        sensors: simulation.describe_sensors(),
    })
}

fn print_scene_info(info: &SceneInfo) {
    println!("Scene {} ({})", info.world.name, info.version);
    println!(
        "  Clock: start={}s step={}s duration={}s ({} ticks)",
        info.world.start_time, info.world.step_size, info.world.duration, info.world.ticks
    );
    if let Some(ref prefix) = info.world.topic_prefix {
        println!("  Topic prefix: {prefix}");
    }
    println!("  Output: {} ({})", info.output.name, info.output.kind);

    println!("\nSensors ({})", info.sensors.len());
    for sensor in &info.sensors {
        let rate = match sensor.period_s {
            Some(period) => format!("{} Hz, every {period}s", sensor.update_rate_hz),
            None => "every tick".to_string(),
        };
        println!("  - [{}] {} ({})", sensor.id, sensor.name, sensor.kind);
        println!("      topic: {}", sensor.topic);
        println!("      rate:  {rate}");
        println!("      pose:  {}", sensor.pose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::{ConfigFormat, ConfigLoader};

    #[test]
    fn test_build_scene_info() {
        let blueprint = ConfigLoader::load_from_str(
            r#"
[world]
name = "yard"
step_size = 0.5
duration = 2.0

[[sensors]]
name = "radar"
type = "radar"
update_rate = 2
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let info = build_scene_info(blueprint).unwrap();
        assert_eq!(info.world.ticks, 5);
        assert_eq!(info.output.kind, "log");
        assert_eq!(info.sensors[0].topic, "/sensors/radar");
        assert_eq!(info.sensors[0].period_s, Some(0.5));
    }
}
