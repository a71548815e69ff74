//! Publisher trait - Topic output interface
//!
//! Sensor kinds hand finished packets to a publisher under their topic.
//! The scheduling core never publishes on its own.

use std::sync::Arc;

use crate::{ContractError, SensorPacket};

/// Publisher shared by every sensor that writes to it.
pub type SharedPublisher = Arc<dyn Publisher>;

/// Data output trait
///
/// All publisher implementations must implement this trait.
pub trait Publisher: Send + Sync {
    /// Publisher name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Publish one packet on a topic
    ///
    /// # Errors
    /// Returns publish error (should include context)
    fn publish(&self, topic: &str, packet: SensorPacket) -> Result<(), ContractError>;
}
