//! Manager - Owns live sensors, hands out identifiers, drives updates
//!
//! The manager is the only code allowed to bind a sensor. Sensors keep a
//! [`ManagerHandle`] back to it, which is a weak, read-only view.

use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{ConfigElement, ContractError, SensorId, SimTime};
use tracing::{debug, info, instrument};

use crate::registry::SensorRegistry;
use crate::sensor::{Sensor, UpdateOutcome};

/// Process-wide identifier source; 0 is reserved for the unbound sentinel.
static NEXT_SENSOR_ID: AtomicU64 = AtomicU64::new(1);

fn allocate_id() -> SensorId {
    SensorId::from_raw(NEXT_SENSOR_ID.fetch_add(1, Ordering::Relaxed))
}

/// Read-only facts about a manager, shared with its sensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerContext {
    pub name: String,
    pub topic_prefix: Option<String>,
}

/// Non-owning reference from a sensor to its manager.
#[derive(Debug, Clone)]
pub struct ManagerHandle(Weak<ManagerContext>);

impl ManagerHandle {
    /// Snapshot of the manager context, `None` once the manager is gone.
    pub fn context(&self) -> Option<Rc<ManagerContext>> {
        self.0.upgrade()
    }

    pub fn name(&self) -> Option<String> {
        self.context().map(|ctx| ctx.name.clone())
    }

    pub fn topic_prefix(&self) -> Option<String> {
        self.context().and_then(|ctx| ctx.topic_prefix.clone())
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// True if both handles point at the same manager.
    pub fn same_manager(&self, other: &ManagerHandle) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

/// Per-call tally of [`Manager::run_once`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub updated: usize,
    pub not_due: usize,
    pub failed: usize,
    /// Outcome per sensor, in identifier order
    pub outcomes: Vec<(SensorId, UpdateOutcome)>,
}

impl RunSummary {
    fn record(&mut self, id: SensorId, outcome: UpdateOutcome) {
        match outcome {
            UpdateOutcome::Updated => self.updated += 1,
            UpdateOutcome::NotDue => self.not_due += 1,
            UpdateOutcome::Failed => self.failed += 1,
        }
        self.outcomes.push((id, outcome));
    }

    pub fn total(&self) -> usize {
        self.updated + self.not_due + self.failed
    }
}

/// Owns sensors, keyed by identifier.
#[derive(Debug)]
pub struct Manager {
    context: Rc<ManagerContext>,
    registry: SensorRegistry,
    sensors: BTreeMap<SensorId, Sensor>,
}

impl Manager {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_context(name.into(), None)
    }

    /// Manager whose sensor kinds prepend `prefix` to every topic.
    ///
    /// The prefix is fixed for the manager's lifetime, so every bound sensor
    /// sees the same context.
    pub fn with_topic_prefix(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::with_context(name.into(), Some(prefix.into()))
    }

    fn with_context(name: String, topic_prefix: Option<String>) -> Self {
        Self {
            context: Rc::new(ManagerContext { name, topic_prefix }),
            registry: SensorRegistry::new(),
            sensors: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.context.name
    }

    pub fn topic_prefix(&self) -> Option<&str> {
        self.context.topic_prefix.as_deref()
    }

    pub fn handle(&self) -> ManagerHandle {
        ManagerHandle(Rc::downgrade(&self.context))
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SensorRegistry {
        &mut self.registry
    }

    /// Build, load and bind a sensor from a `<sensor type="...">` element.
    ///
    /// # Errors
    /// Missing `type`, an unregistered type, any load error. The sensor is
    /// not registered when this fails.
    #[instrument(
        name = "manager_create_sensor",
        skip(self, element),
        fields(manager = %self.context.name, sensor = element.attribute("name").unwrap_or_default())
    )]
    pub fn create_sensor(&mut self, element: &dyn ConfigElement) -> Result<SensorId, ContractError> {
        let sensor_type = element
            .attribute("type")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ContractError::missing_field(element.element_name(), "type"))?;

        let generator = self.registry.create(sensor_type, element)?;
        let mut sensor = Sensor::from_boxed(generator);
        sensor.load(element)?;
        self.add_sensor(sensor)
    }

    /// Bind an already loaded sensor and take ownership of it.
    ///
    /// # Errors
    /// `ConfigValidation` if the sensor was never loaded, `AlreadyBound` if it
    /// belongs to a manager already.
    pub fn add_sensor(&mut self, mut sensor: Sensor) -> Result<SensorId, ContractError> {
        if !sensor.is_loaded() {
            return Err(ContractError::config_validation(
                "sensor",
                format!("sensor of kind '{}' must be loaded before it is added", sensor.kind()),
            ));
        }
        if sensor.id().is_bound() {
            return Err(ContractError::AlreadyBound {
                name: sensor.name().to_string(),
                existing: sensor.id(),
            });
        }

        let id = allocate_id();
        sensor.bind(self.handle(), id)?;

        info!(
            manager = %self.context.name,
            sensor = %sensor.name(),
            id = %id,
            kind = %sensor.kind(),
            update_rate = sensor.update_rate(),
            "sensor registered"
        );
        self.sensors.insert(id, sensor);
        Ok(id)
    }

    /// Take a sensor out of the manager. It keeps its identifier.
    pub fn remove(&mut self, id: SensorId) -> Option<Sensor> {
        let removed = self.sensors.remove(&id);
        if let Some(sensor) = &removed {
            debug!(manager = %self.context.name, sensor = %sensor.name(), id = %id, "sensor removed");
        }
        removed
    }

    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.get(&id)
    }

    pub fn sensor_mut(&mut self, id: SensorId) -> Option<&mut Sensor> {
        self.sensors.get_mut(&id)
    }

    /// Identifiers in ascending order.
    pub fn ids(&self) -> Vec<SensorId> {
        self.sensors.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.values()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Dispatch every sensor once at `now`, in identifier order.
    #[instrument(
        level = "trace",
        name = "manager_run_once",
        skip(self),
        fields(manager = %self.context.name, sensors = self.sensors.len())
    )]
    pub fn run_once(&mut self, now: SimTime, force: bool) -> RunSummary {
        let mut summary = RunSummary::default();

        for (id, sensor) in self.sensors.iter_mut() {
            let outcome = sensor.update(now, force);
            observability::record_update(sensor.name(), outcome.as_str(), force);
            if outcome.is_updated() && !force {
                observability::record_next_update_time(sensor.name(), sensor.next_update_time());
            }
            summary.record(*id, outcome);
        }

        summary
    }

    /// Earliest due time across all sensors, `None` when empty.
    pub fn next_update_time(&self) -> Option<SimTime> {
        self.sensors
            .values()
            .map(Sensor::next_update_time)
            .reduce(f64::min)
    }

    /// Sensors eligible for a scheduled update at `now`.
    pub fn due_sensors(&self, now: SimTime) -> Vec<SensorId> {
        self.sensors
            .iter()
            .filter(|(_, sensor)| sensor.is_due(now))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Re-anchor every schedule at `now` after the simulation clock was reset.
    #[instrument(name = "manager_reset_schedules", skip(self), fields(manager = %self.context.name))]
    pub fn reset_schedules(&mut self, now: SimTime) {
        for sensor in self.sensors.values_mut() {
            sensor.reset_schedule(now);
        }
        info!(sensors = self.sensors.len(), now, "schedules reset");
    }
}
