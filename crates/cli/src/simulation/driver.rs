//! Simulation driver
//!
//! Builds the manager from a scene, then steps the clock tick by tick. Tick
//! times are computed from the tick index so long runs do not drift.

use std::time::Instant;

use contracts::{format_pose, ConfigElement, SceneBlueprint, SimTime};
use observability::UpdateMetricsAggregator;
use publishers::{create_publisher, PublisherHandle};
use sensor_kinds::register_builtin;
use sensors::{schedule, Manager, RunSummary};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::RunStats;
use crate::error::CliError;

/// Driver settings
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub blueprint: SceneBlueprint,

    /// Force every sensor each N ticks (None = never)
    pub force_every: Option<u64>,

    /// Rewind the clock to `start_time` once after N ticks (None = never)
    pub rewind_after: Option<u64>,
}

/// Effective settings of one loaded sensor
#[derive(Debug, Clone, Serialize)]
pub struct SensorInfo {
    pub id: u64,
    pub name: String,
    pub kind: String,
    pub topic: String,
    pub update_rate_hz: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_s: Option<f64>,
    pub pose: String,
}

pub struct Simulation {
    config: SimulationConfig,
    manager: Manager,
    output: PublisherHandle,
}

impl Simulation {
    /// Create the publisher and manager and load every sensor of the scene.
    ///
    /// # Errors
    /// The first sensor that fails to be created, by name.
    #[instrument(
        name = "simulation_build",
        skip(config),
        fields(world = %config.blueprint.world.name, sensors = config.blueprint.sensors.len())
    )]
    pub fn build(config: SimulationConfig) -> Result<Self, CliError> {
        let blueprint = &config.blueprint;
        let output = create_publisher(&blueprint.output);

        let mut manager = match &blueprint.world.topic_prefix {
            Some(prefix) => Manager::with_topic_prefix(blueprint.world.name.clone(), prefix.clone()),
            None => Manager::new(blueprint.world.name.clone()),
        };
        register_builtin(manager.registry_mut(), output.publisher());

        for element in blueprint.sensor_elements() {
            let name = element.attribute("name").unwrap_or("<unnamed>").to_string();
            manager
                .create_sensor(&element)
                .map_err(|e| CliError::sensor_setup(name, e))?;
        }

        info!(sensors = manager.len(), "simulation ready");
        Ok(Self {
            config,
            manager,
            output,
        })
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    pub fn output(&self) -> &PublisherHandle {
        &self.output
    }

    /// Effective per-sensor settings in identifier order.
    pub fn describe_sensors(&self) -> Vec<SensorInfo> {
        let prefix = self.manager.topic_prefix().unwrap_or_default();

        self.manager
            .iter()
            .map(|sensor| SensorInfo {
                id: sensor.id().get(),
                name: sensor.name().to_string(),
                kind: sensor.kind().to_string(),
                topic: format!("{}{}", prefix.trim_end_matches('/'), sensor.topic()),
                update_rate_hz: sensor.update_rate(),
                period_s: schedule::period(sensor.update_rate()),
                pose: format_pose(sensor.pose()),
            })
            .collect()
    }

    /// Step the clock from `start_time` through `start_time + duration`.
    #[instrument(name = "simulation_run", skip(self), fields(world = %self.manager.name()))]
    pub fn run(&mut self) -> RunStats {
        let world = self.config.blueprint.world.clone();
        let ticks = world.tick_count();
        let started = Instant::now();
        let mut aggregator = UpdateMetricsAggregator::new();
        let mut rewound = false;
        let mut executed: u64 = 0;
        let mut last_time = world.start_time;

        info!(ticks, step = world.step_size, start = world.start_time, "simulation started");

        let mut tick = 0;
        while tick < ticks {
            let now = world.tick_time(tick);
            last_time = now;
            aggregator.observe_tick();

            let summary = self.manager.run_once(now, false);
            self.observe(&mut aggregator, now, &summary, false);

            if self.force_due(tick) {
                let forced = self.manager.run_once(now, true);
                debug!(now, updated = forced.updated, failed = forced.failed, "forced pass");
                self.observe(&mut aggregator, now, &forced, true);
            }

            executed += 1;
            if !rewound && self.config.rewind_after == Some(executed) {
                rewound = true;
                info!(now, rewind_to = world.start_time, "rewinding simulation clock");
                self.manager.reset_schedules(world.start_time);
                aggregator.observe_reset();
                tick = 0;
                continue;
            }
            tick += 1;
        }

        let stats = RunStats {
            world: world.name.clone(),
            ticks: executed,
            sim_start: world.start_time,
            sim_end: last_time,
            wall_secs: started.elapsed().as_secs_f64(),
            sensors: self.manager.len(),
            publish: self.output.snapshot(),
            updates: aggregator.summary(),
        };

        info!(
            ticks = stats.ticks,
            scheduled = stats.updates.scheduled_updates,
            forced = stats.updates.forced_updates,
            failures = stats.updates.failures,
            packets = stats.publish.packets,
            "simulation finished"
        );
        stats
    }

    fn force_due(&self, tick: u64) -> bool {
        self.config
            .force_every
            .is_some_and(|every| tick > 0 && tick % every == 0)
    }

    fn observe(&self, aggregator: &mut UpdateMetricsAggregator, now: SimTime, summary: &RunSummary, forced: bool) {
        for (id, outcome) in &summary.outcomes {
            if let Some(sensor) = self.manager.sensor(*id) {
                aggregator.observe(sensor.name(), now, outcome.as_str(), forced);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::{ConfigFormat, ConfigLoader};

    const SCENE: &str = r#"
[world]
name = "lab"
step_size = 0.0625
duration = 1.0
topic_prefix = "/lab"

[output]
kind = "memory"

[[sensors]]
name = "cam"
type = "camera"
update_rate = 4
image_width = 2
image_height = 2

[[sensors]]
name = "imu"
type = "imu"

[[sensors]]
name = "gps"
type = "gnss"
update_rate = 1
pose = [1.0, 2.0, 3.0, 0.0, 0.0, 0.0]
"#;

    fn simulation(force_every: Option<u64>, rewind_after: Option<u64>) -> Simulation {
        let blueprint = ConfigLoader::load_from_str(SCENE, ConfigFormat::Toml).unwrap();
        Simulation::build(SimulationConfig {
            blueprint,
            force_every,
            rewind_after,
        })
        .unwrap()
    }

    #[test]
    fn test_update_counts() {
        let mut sim = simulation(None, None);
        let stats = sim.run();

        // 17 ticks: 0.0, 0.0625, ..., 1.0
        assert_eq!(stats.ticks, 17);
        let by_name = |name: &str| {
            stats
                .updates
                .sensors
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.updates)
        };
        assert_eq!(by_name("cam"), Some(5));
        assert_eq!(by_name("imu"), Some(17));
        assert_eq!(by_name("gps"), Some(2));
        assert_eq!(stats.publish.packets, 24);
        assert_eq!(stats.sim_end, 1.0);
    }

    #[test]
    fn test_topics_use_prefix() {
        let mut sim = simulation(None, None);
        sim.run();
        let memory = sim.output().memory().unwrap();
        assert_eq!(memory.packets_on("/lab/sensors/cam").len(), 5);
    }

    #[test]
    fn test_forced_passes_do_not_shift_schedule() {
        let mut sim = simulation(Some(2), None);
        let stats = sim.run();

        let cam = stats.updates.sensors.iter().find(|s| s.name == "cam").unwrap();
        assert_eq!(cam.updates, 5);
        assert_eq!(cam.forced, 8);
        assert_eq!(cam.achieved_rate_hz, Some(4.0));
    }

    #[test]
    fn test_rewind_resynchronizes() {
        let mut sim = simulation(None, Some(9));
        let stats = sim.run();

        assert_eq!(stats.ticks, 9 + 17);
        assert_eq!(stats.updates.resets, 1);
        let cam = stats.updates.sensors.iter().find(|s| s.name == "cam").unwrap();
        // ticks 0..=8 cover 0.0..=0.5 (3 updates), then a full second (5 updates)
        assert_eq!(cam.updates, 3 + 5);
    }

    #[test]
    fn test_describe_sensors() {
        let sim = simulation(None, None);
        let sensors = sim.describe_sensors();

        assert_eq!(sensors.len(), 3);
        assert_eq!(sensors[0].name, "cam");
        assert_eq!(sensors[0].topic, "/lab/sensors/cam");
        assert_eq!(sensors[0].period_s, Some(0.25));
        assert_eq!(sensors[1].period_s, None);
        assert_eq!(sensors[2].pose, "1 2 3 0 0 0");
    }

    #[test]
    fn test_bad_sensor_named_in_error() {
        let mut blueprint = ConfigLoader::load_from_str(SCENE, ConfigFormat::Toml).unwrap();
        blueprint.sensors[1].insert(
            "type".into(),
            contracts::ConfigValue::Text("sonar".into()),
        );
        let err = Simulation::build(SimulationConfig {
            blueprint,
            force_every: None,
            rewind_after: None,
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("'imu'"));
        assert!(err.to_string().contains("sonar"));
    }
}
