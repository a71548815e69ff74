//! NullPublisher - counts and discards

use std::sync::Arc;

use contracts::{ContractError, Publisher, SensorPacket};

use crate::stats::PublishStats;

pub struct NullPublisher {
    name: String,
    stats: Arc<PublishStats>,
}

impl NullPublisher {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_stats(name, Arc::default())
    }

    pub(crate) fn with_stats(name: impl Into<String>, stats: Arc<PublishStats>) -> Self {
        Self {
            name: name.into(),
            stats,
        }
    }
}

impl Publisher for NullPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    fn publish(&self, topic: &str, packet: SensorPacket) -> Result<(), ContractError> {
        self.stats
            .record(&self.name, topic, packet.payload.byte_len(), true);
        Ok(())
    }
}
