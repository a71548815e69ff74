//! DataGenerator - The one capability a concrete sensor kind provides
//!
//! Generators decide *what* to produce when asked, never *whether* to run.
//! The dispatcher in [`crate::Sensor`] owns all timing decisions.

use contracts::{ConfigElement, ContractError, Pose, SensorId, SimTime};
use thiserror::Error;

use crate::manager::ManagerHandle;
use crate::state::SensorState;

/// Generation failure reported by a sensor kind.
///
/// Recovered locally: the schedule is not advanced and the same due time is
/// retried on the next scheduled call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Nothing could be produced this cycle
    #[error("no data produced: {reason}")]
    NoData { reason: String },

    /// Produced data could not be handed to the publisher
    #[error("publish failed: {0}")]
    Publish(#[from] ContractError),
}

impl GenerationError {
    pub fn no_data(reason: impl Into<String>) -> Self {
        Self::NoData {
            reason: reason.into(),
        }
    }
}

/// Read-only view of the sensor handed to a generator.
#[derive(Debug, Clone, Copy)]
pub struct SensorContext<'a> {
    state: &'a SensorState,
    manager: Option<&'a ManagerHandle>,
}

impl<'a> SensorContext<'a> {
    pub(crate) fn new(state: &'a SensorState, manager: Option<&'a ManagerHandle>) -> Self {
        Self { state, manager }
    }

    pub fn id(&self) -> SensorId {
        self.state.id()
    }

    pub fn name(&self) -> &'a str {
        self.state.name()
    }

    pub fn topic(&self) -> &'a str {
        self.state.topic()
    }

    /// Topic with the manager's prefix applied, if it has one.
    pub fn qualified_topic(&self) -> String {
        match self.manager.and_then(ManagerHandle::topic_prefix) {
            Some(prefix) => format!("{}{}", prefix.trim_end_matches('/'), self.topic()),
            None => self.topic().to_string(),
        }
    }

    pub fn pose(&self) -> &'a Pose {
        self.state.pose()
    }

    pub fn update_rate(&self) -> f64 {
        self.state.update_rate()
    }

    /// Owning manager, `None` while unbound.
    pub fn manager(&self) -> Option<&'a ManagerHandle> {
        self.manager
    }
}

/// Payload generation capability of a sensor kind.
pub trait DataGenerator {
    /// Sensor kind, e.g. `camera`.
    fn kind(&self) -> &str;

    /// Kind-specific configuration, run after the common fields were extracted.
    ///
    /// # Errors
    /// Any configuration error; the sensor then stays unloaded.
    fn load(&mut self, element: &dyn ConfigElement) -> Result<(), ContractError> {
        let _ = element;
        Ok(())
    }

    /// Produce data for simulation time `now`.
    fn generate(&mut self, now: SimTime, sensor: &SensorContext<'_>) -> Result<(), GenerationError>;
}
