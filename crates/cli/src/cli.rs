//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sensor-sim - drive simulated sensors through a fixed-step clock
#[derive(Parser, Debug)]
#[command(
    name = "sensor-sim",
    author,
    version,
    about = "Simulated sensor update scheduler",
    long_about = "Loads a scene of simulated sensors, steps a simulation clock and lets\n\
                  each sensor decide when to generate data according to its update rate."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SENSOR_SIM_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "SENSOR_SIM_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the simulation
    Run(RunArgs),

    /// Validate a scene file, including loading every sensor
    Validate(ValidateArgs),

    /// Display the effective sensor configuration
    Info(InfoArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to scene file (TOML or JSON)
    #[arg(short, long, default_value = "scene.toml", env = "SENSOR_SIM_SCENE")]
    pub config: PathBuf,

    /// Override simulated duration (seconds)
    #[arg(long)]
    pub duration: Option<f64>,

    /// Override clock step (seconds)
    #[arg(long)]
    pub step: Option<f64>,

    /// Force an update of every sensor each N ticks (0 = never)
    #[arg(long, default_value = "0", env = "SENSOR_SIM_FORCE_EVERY")]
    pub force_every: u64,

    /// Rewind the clock to start_time once, after this many ticks (0 = never)
    #[arg(long, default_value = "0")]
    pub rewind_after: u64,

    /// Build all sensors and exit without stepping the clock
    #[arg(long)]
    pub dry_run: bool,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "SENSOR_SIM_METRICS_PORT")]
    pub metrics_port: u16,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to scene file to validate
    #[arg(short, long, default_value = "scene.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to scene file
    #[arg(short, long, default_value = "scene.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
