//! Sensor - Schedule-gated dispatch around a [`DataGenerator`]
//!
//! The manager calls [`Sensor::scheduled_update`] with the current simulation
//! time; the sensor decides whether its generator is due and advances its own
//! schedule. [`Sensor::forced_update`] runs the generator out of band and
//! leaves the schedule exactly as it was.

use contracts::{parse_pose, ConfigElement, ContractError, Pose, SensorId, SimTime, SENSOR_ELEMENT};
use tracing::{debug, trace, warn};

use crate::generator::{DataGenerator, GenerationError, SensorContext};
use crate::manager::ManagerHandle;
use crate::state::SensorState;

/// Result of one dispatch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOutcome {
    /// The generator ran and reported success
    Updated,
    /// Not eligible yet; nothing ran and nothing changed
    NotDue,
    /// The generator ran and reported failure
    Failed,
}

impl UpdateOutcome {
    pub fn is_updated(self) -> bool {
        matches!(self, Self::Updated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::NotDue => "not_due",
            Self::Failed => "failed",
        }
    }
}

/// A simulated sensor: scheduling state, manager binding, and the generator.
pub struct Sensor {
    state: SensorState,
    manager: Option<ManagerHandle>,
    generator: Box<dyn DataGenerator>,
    loaded: bool,
}

impl std::fmt::Debug for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sensor")
            .field("kind", &self.generator.kind())
            .field("state", &self.state)
            .field("bound", &self.manager.is_some())
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl Sensor {
    /// Create an unbound, unloaded sensor.
    pub fn new(generator: impl DataGenerator + 'static) -> Self {
        Self::from_boxed(Box::new(generator))
    }

    pub fn from_boxed(generator: Box<dyn DataGenerator>) -> Self {
        Self {
            state: SensorState::default(),
            manager: None,
            generator,
            loaded: false,
        }
    }

    /// Load common fields from a `<sensor>` element, then the kind's own fields.
    ///
    /// Extracted fields:
    /// - attribute `name` (required, no whitespace)
    /// - child `topic` (default `/sensors/<name>`)
    /// - child `update_rate` in Hz (default 0, negative values clamp to 0)
    /// - child `pose` as `x y z roll pitch yaw` (default identity)
    ///
    /// Nothing is committed unless both stages succeed.
    ///
    /// # Errors
    /// Configuration errors for missing or malformed fields, or whatever the
    /// generator's own `load` reports.
    pub fn load(&mut self, element: &dyn ConfigElement) -> Result<(), ContractError> {
        if self.loaded {
            return Err(ContractError::config_validation(
                self.state.name(),
                "sensor is already loaded",
            ));
        }

        if element.element_name() != SENSOR_ELEMENT {
            return Err(ContractError::config_validation(
                element.element_name(),
                format!("expected <{SENSOR_ELEMENT}> element"),
            ));
        }

        let name = element
            .attribute("name")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ContractError::missing_field(SENSOR_ELEMENT, "name"))?;
        if name.chars().any(char::is_whitespace) {
            return Err(ContractError::malformed_field(
                "name",
                name,
                "sensor name cannot contain whitespace",
            ));
        }

        let topic = match element.child_text("topic") {
            Some(topic) => validate_topic(topic)?.to_string(),
            None => format!("/sensors/{name}"),
        };

        let rate = element.get_or::<f64>("update_rate", 0.0)?;
        let pose = match element.child_text("pose") {
            Some(text) => parse_pose(text)?,
            None => Pose::identity(),
        };

        self.generator.load(element)?;

        self.state.set_identity(name.to_string(), topic);
        self.state.set_update_rate(rate);
        self.state.set_pose(pose);
        self.loaded = true;

        debug!(
            sensor = %self.state.name(),
            kind = %self.generator.kind(),
            topic = %self.state.topic(),
            update_rate = self.state.update_rate(),
            "sensor loaded"
        );
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Run the generator if the schedule allows it.
    ///
    /// Eligible iff `now >= next_update_time()`. On success the schedule
    /// moves to `now` plus one period; on failure it stays put so the same
    /// due time is retried. A `now` before the due time (including a clock
    /// that went backward) is a no-op.
    pub fn scheduled_update(&mut self, now: SimTime) -> UpdateOutcome {
        if !self.is_due(now) {
            trace!(
                sensor = %self.state.name(),
                now,
                next = self.state.next_update_time(),
                "sensor not due"
            );
            return UpdateOutcome::NotDue;
        }

        match self.invoke(now) {
            Ok(()) => {
                self.state.record_scheduled(now);
                trace!(
                    sensor = %self.state.name(),
                    now,
                    next = self.state.next_update_time(),
                    "scheduled update"
                );
                UpdateOutcome::Updated
            }
            Err(e) => {
                warn!(
                    sensor = %self.state.name(),
                    now,
                    error = %e,
                    "scheduled update failed, will retry"
                );
                UpdateOutcome::Failed
            }
        }
    }

    /// Run the generator unconditionally. The schedule is never touched.
    pub fn forced_update(&mut self, now: SimTime) -> UpdateOutcome {
        match self.invoke(now) {
            Ok(()) => {
                debug!(sensor = %self.state.name(), now, "forced update");
                UpdateOutcome::Updated
            }
            Err(e) => {
                warn!(sensor = %self.state.name(), now, error = %e, "forced update failed");
                UpdateOutcome::Failed
            }
        }
    }

    /// Single entry point: forced when `force` is set, scheduled otherwise.
    pub fn update(&mut self, now: SimTime, force: bool) -> UpdateOutcome {
        if force {
            self.forced_update(now)
        } else {
            self.scheduled_update(now)
        }
    }

    pub fn is_due(&self, now: SimTime) -> bool {
        now >= self.state.next_update_time()
    }

    pub fn next_update_time(&self) -> SimTime {
        self.state.next_update_time()
    }

    pub fn last_update_time(&self) -> SimTime {
        self.state.last_update_time()
    }

    pub fn update_rate(&self) -> f64 {
        self.state.update_rate()
    }

    /// Change the rate. Applies from the next computed schedule onward;
    /// an already computed `next_update_time()` is kept.
    pub fn set_update_rate(&mut self, hz: f64) {
        self.state.set_update_rate(hz);
    }

    pub fn pose(&self) -> &Pose {
        self.state.pose()
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.state.set_pose(pose);
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn topic(&self) -> &str {
        self.state.topic()
    }

    pub fn id(&self) -> SensorId {
        self.state.id()
    }

    pub fn kind(&self) -> &str {
        self.generator.kind()
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }

    /// Owning manager, `None` until bound.
    pub fn manager(&self) -> Option<&ManagerHandle> {
        self.manager.as_ref()
    }

    /// Attach identity and manager. Succeeds at most once per instance.
    pub(crate) fn bind(&mut self, manager: ManagerHandle, id: SensorId) -> Result<(), ContractError> {
        if self.state.id().is_bound() {
            return Err(ContractError::AlreadyBound {
                name: self.state.name().to_string(),
                existing: self.state.id(),
            });
        }
        if !id.is_bound() {
            return Err(ContractError::SentinelId {
                name: self.state.name().to_string(),
            });
        }

        self.state.set_id(id);
        self.manager = Some(manager);
        Ok(())
    }

    pub(crate) fn reset_schedule(&mut self, now: SimTime) {
        self.state.reset_schedule(now);
    }

    fn invoke(&mut self, now: SimTime) -> Result<(), GenerationError> {
        let context = SensorContext::new(&self.state, self.manager.as_ref());
        self.generator.generate(now, &context)
    }
}

fn validate_topic(topic: &str) -> Result<&str, ContractError> {
    let problem = if !topic.starts_with('/') {
        Some("topic must start with '/'")
    } else if topic.len() > 1 && topic.ends_with('/') {
        Some("topic cannot end with '/'")
    } else if topic.chars().any(char::is_whitespace) {
        Some("topic cannot contain whitespace")
    } else {
        None
    };

    match problem {
        Some(message) => Err(ContractError::malformed_field("topic", topic, message)),
        None => Ok(topic),
    }
}
