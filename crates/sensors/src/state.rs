//! Per-sensor scalar and pose state.

use contracts::{Pose, SensorId, SimTime, EPOCH};

use crate::schedule;

/// Mutable record owned by exactly one sensor.
///
/// Holds no behavior beyond storage: the dispatcher in [`crate::Sensor`]
/// decides when the schedule fields move.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    update_rate_hz: f64,
    next_update_time: SimTime,
    last_update_time: SimTime,
    pose: Pose,
    name: String,
    topic: String,
    id: SensorId,
}

impl Default for SensorState {
    fn default() -> Self {
        Self {
            update_rate_hz: 0.0,
            next_update_time: EPOCH,
            last_update_time: EPOCH,
            pose: Pose::identity(),
            name: String::new(),
            topic: String::new(),
            id: SensorId::NONE,
        }
    }
}

impl SensorState {
    pub fn update_rate(&self) -> f64 {
        self.update_rate_hz
    }

    pub fn next_update_time(&self) -> SimTime {
        self.next_update_time
    }

    pub fn last_update_time(&self) -> SimTime {
        self.last_update_time
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    /// Store a rate, clamping invalid values to 0. Never touches the schedule.
    pub(crate) fn set_update_rate(&mut self, hz: f64) {
        self.update_rate_hz = schedule::sanitize_rate(hz);
    }

    pub(crate) fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub(crate) fn set_identity(&mut self, name: String, topic: String) {
        self.name = name;
        self.topic = topic;
    }

    pub(crate) fn set_id(&mut self, id: SensorId) {
        self.id = id;
    }

    /// Record a successful scheduled generation at `now`.
    pub(crate) fn record_scheduled(&mut self, now: SimTime) {
        self.last_update_time = now;
        self.next_update_time = schedule::next_update_time(self.update_rate_hz, now);
    }

    /// Re-anchor the schedule at `now`, making the sensor due immediately.
    pub(crate) fn reset_schedule(&mut self, now: SimTime) {
        self.last_update_time = now;
        self.next_update_time = now;
    }
}
