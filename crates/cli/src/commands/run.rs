//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::simulation::{Simulation, SimulationConfig};

/// Execute the `run` command
pub fn run_simulation(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading scene");

    if !args.config.exists() {
        return Err(CliError::scene_not_found(args.config.display().to_string()).into());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load scene from {}", args.config.display()))?;

    if let Some(duration) = args.duration {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(CliError::invalid_override("duration", format!("{duration} must be >= 0")).into());
        }
        info!(duration, "Overriding duration from CLI");
        blueprint.world.duration = duration;
    }
    if let Some(step) = args.step {
        if !(step.is_finite() && step > 0.0) {
            return Err(CliError::invalid_override("step", format!("{step} must be > 0")).into());
        }
        info!(step, "Overriding step size from CLI");
        blueprint.world.step_size = step;
    }
    config_loader::ConfigLoader::validate(&blueprint)?;

    info!(
        world = %blueprint.world.name,
        sensors = blueprint.sensors.len(),
        ticks = blueprint.world.tick_count(),
        output = ?blueprint.output.kind,
        "Scene loaded"
    );

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut simulation = Simulation::build(SimulationConfig {
        blueprint,
        force_every: (args.force_every > 0).then_some(args.force_every),
        rewind_after: (args.rewind_after > 0).then_some(args.rewind_after),
    })?;

    if args.dry_run {
        info!(
            manager = %simulation.manager().name(),
            sensors = simulation.manager().len(),
            "Dry run mode - all sensors loaded, exiting"
        );
        for sensor in simulation.describe_sensors() {
            println!(
                "  - {} ({}) {} @ {} Hz",
                sensor.name, sensor.kind, sensor.topic, sensor.update_rate_hz
            );
        }
        return Ok(());
    }

    let stats = simulation.run();

    if args.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize run stats")?;
        println!("{json}");
    } else {
        stats.print_summary();
    }

    Ok(())
}
