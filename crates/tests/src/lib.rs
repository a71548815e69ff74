//! # Integration Tests
//!
//! Scene files through the loader, the manager and the mock sensor kinds,
//! with packets captured by an in-memory publisher.

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
        assert!(!contracts::NO_SENSOR.is_bound());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{SceneBlueprint, SharedPublisher, SimTime};
    use observability::UpdateMetricsAggregator;
    use publishers::MemoryPublisher;
    use sensor_kinds::register_builtin;
    use sensors::{Manager, SensorId};

    struct Harness {
        manager: Manager,
        memory: Arc<MemoryPublisher>,
        ids: Vec<SensorId>,
        blueprint: SceneBlueprint,
    }

    fn harness(blueprint: SceneBlueprint) -> Harness {
        let memory = Arc::new(MemoryPublisher::new("memory"));
        let publisher: SharedPublisher = memory.clone();

        let mut manager = match &blueprint.world.topic_prefix {
            Some(prefix) => Manager::with_topic_prefix(blueprint.world.name.clone(), prefix.clone()),
            None => Manager::new(blueprint.world.name.clone()),
        };
        register_builtin(manager.registry_mut(), publisher);

        let ids = blueprint
            .sensor_elements()
            .iter()
            .map(|element| manager.create_sensor(element).unwrap())
            .collect();

        Harness {
            manager,
            memory,
            ids,
            blueprint,
        }
    }

    fn toml_harness(content: &str) -> Harness {
        harness(ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap())
    }

    fn tick_times(blueprint: &SceneBlueprint) -> Vec<SimTime> {
        let world = &blueprint.world;
        (0..world.tick_count()).map(|i| world.tick_time(i)).collect()
    }

    const LAB: &str = r#"
[world]
name = "lab"
step_size = 0.0625
duration = 1.0

[output]
kind = "memory"

[[sensors]]
name = "cam"
type = "camera"
update_rate = 4
image_width = 4
image_height = 2
"#;

    /// A 4 Hz camera on a 16 Hz clock publishes at 0, 0.25, 0.5, 0.75 and 1.0.
    #[test]
    fn test_e2e_rate_limited_camera() {
        let mut h = toml_harness(LAB);
        let times = tick_times(&h.blueprint);
        assert_eq!(times.len(), 17);

        let mut updated_at = Vec::new();
        for now in times {
            if h.manager.run_once(now, false).updated > 0 {
                updated_at.push(now);
            }
        }

        assert_eq!(updated_at, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        let packets = h.memory.packets_on("/sensors/cam");
        assert_eq!(packets.len(), 5);
        let timestamps: Vec<_> = packets.iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, updated_at);
        assert_eq!(packets[4].frame_id, 5);
    }

    #[test]
    fn test_e2e_forced_updates_leave_schedule_alone() {
        let mut h = toml_harness(LAB);
        let cam = h.ids[0];

        h.manager.run_once(0.0, false);
        assert_eq!(h.manager.sensor(cam).unwrap().next_update_time(), 0.25);

        let forced = h.manager.run_once(0.125, true);
        assert_eq!(forced.updated, 1);
        assert_eq!(h.manager.sensor(cam).unwrap().next_update_time(), 0.25);

        // Forced at a due time still does not consume the scheduled slot.
        h.manager.run_once(0.25, true);
        assert!(h.manager.sensor(cam).unwrap().is_due(0.25));
        assert_eq!(h.manager.run_once(0.25, false).updated, 1);
        assert_eq!(h.manager.sensor(cam).unwrap().next_update_time(), 0.5);

        assert_eq!(h.memory.len(), 4);
    }

    #[test]
    fn test_e2e_dropout_is_retried() {
        let mut h = toml_harness(
            r#"
[world]
step_size = 0.0625
duration = 0.5

[[sensors]]
name = "imu"
type = "imu"
update_rate = 4
dropout_every = 2
"#,
        );
        let imu = h.ids[0];

        let outcomes: Vec<_> = tick_times(&h.blueprint)
            .into_iter()
            .map(|now| (now, h.manager.run_once(now, false)))
            .filter(|(_, summary)| summary.not_due == 0)
            .map(|(now, summary)| (now, summary.updated, summary.failed))
            .collect();

        // Attempt 2 at 0.25 drops out; the same due time is retried one tick later.
        assert_eq!(
            outcomes,
            vec![(0.0, 1, 0), (0.25, 0, 1), (0.3125, 1, 0)]
        );
        assert_eq!(h.manager.sensor(imu).unwrap().next_update_time(), 0.5625);
        assert_eq!(h.memory.len(), 2);
    }

    #[test]
    fn test_e2e_clock_rewind_needs_reset() {
        let mut h = toml_harness(LAB);
        for now in tick_times(&h.blueprint) {
            h.manager.run_once(now, false);
        }
        assert_eq!(h.manager.next_update_time(), Some(1.25));

        // Clock went backward: nothing is due until schedules are re-anchored.
        assert_eq!(h.manager.run_once(0.0, false).updated, 0);
        h.manager.reset_schedules(0.0);
        assert_eq!(h.manager.due_sensors(0.0), h.ids);
        assert_eq!(h.manager.run_once(0.0, false).updated, 1);
        assert_eq!(h.memory.len(), 6);
    }

    #[test]
    fn test_e2e_topic_prefix_and_mixed_rates() {
        let mut h = toml_harness(
            r#"
[world]
name = "yard"
step_size = 0.125
duration = 1.0
topic_prefix = "/yard"

[[sensors]]
name = "gps"
type = "gnss"
update_rate = 1
topic = "/gps/fix"

[[sensors]]
name = "imu"
type = "imu"
"#,
        );

        let mut aggregator = UpdateMetricsAggregator::new();
        for now in tick_times(&h.blueprint) {
            aggregator.observe_tick();
            let summary = h.manager.run_once(now, false);
            for (id, outcome) in summary.outcomes {
                let name = h.manager.sensor(id).unwrap().name().to_string();
                aggregator.observe(&name, now, outcome.as_str(), false);
            }
        }

        assert_eq!(h.memory.packets_on("/yard/gps/fix").len(), 2);
        assert_eq!(h.memory.packets_on("/yard/sensors/imu").len(), 9);

        let summary = aggregator.summary();
        assert_eq!(summary.ticks, 9);
        assert_eq!(summary.scheduled_updates, 11);
        let gps = summary.sensors.iter().find(|s| s.name == "gps").unwrap();
        assert_eq!(gps.achieved_rate_hz, Some(1.0));
    }

    #[test]
    fn test_e2e_ids_unique_across_managers() {
        let a = toml_harness(LAB);
        let b = toml_harness(LAB);

        assert_ne!(a.ids[0], b.ids[0]);
        assert!(a.ids[0].is_bound() && b.ids[0].is_bound());

        let sensor = a.manager.sensor(a.ids[0]).unwrap();
        assert_eq!(sensor.manager().unwrap().name().as_deref(), Some("lab"));
    }

    #[test]
    fn test_e2e_json_scene_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
  "world": {{ "name": "json-world", "step_size": 0.5, "duration": 1.0 }},
  "sensors": [
    {{ "name": "front", "type": "lidar", "update_rate": 2, "lidar_points": 8, "pose": "0 0 2 0 0 0" }}
  ]
}}"#
        )
        .unwrap();

        let blueprint = ConfigLoader::load_from_path(file.path()).unwrap();
        let mut h = harness(blueprint);
        for now in tick_times(&h.blueprint) {
            h.manager.run_once(now, false);
        }

        let sensor = h.manager.sensor(h.ids[0]).unwrap();
        assert_eq!(sensor.kind(), "lidar");
        assert_eq!(sensor.pose().translation.vector.z, 2.0);
        assert_eq!(h.memory.packets_on("/sensors/front").len(), 3);
    }

    #[test]
    fn test_e2e_unknown_type_is_rejected() {
        let blueprint = ConfigLoader::load_from_str(
            r#"
[[sensors]]
name = "s1"
type = "sonar"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let mut manager = Manager::new("world");
        register_builtin(manager.registry_mut(), Arc::new(publishers::NullPublisher::new("null")));
        let element = &blueprint.sensor_elements()[0];
        assert!(manager.create_sensor(element).is_err());
        assert!(manager.is_empty());
    }
}
