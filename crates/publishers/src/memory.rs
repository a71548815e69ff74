//! MemoryPublisher - records packets for later inspection
//!
//! Used by tests and by `run --output memory` to report what was produced.

use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{ContractError, Publisher, SensorPacket};
use tracing::debug;

use crate::stats::PublishStats;

/// A recorded packet and the topic it was published on
#[derive(Debug, Clone)]
pub struct Recorded {
    pub topic: String,
    pub packet: SensorPacket,
}

pub struct MemoryPublisher {
    name: String,
    capacity: Option<usize>,
    records: Mutex<Vec<Recorded>>,
    stats: Arc<PublishStats>,
}

impl MemoryPublisher {
    /// Unbounded recorder
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_stats(name, None, Arc::default())
    }

    /// Recorder that rejects packets once `capacity` are held.
    pub fn bounded(name: impl Into<String>, capacity: usize) -> Self {
        Self::with_stats(name, Some(capacity), Arc::default())
    }

    pub(crate) fn with_stats(
        name: impl Into<String>,
        capacity: Option<usize>,
        stats: Arc<PublishStats>,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            records: Mutex::new(Vec::new()),
            stats,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Recorded>>, ContractError> {
        self.records
            .lock()
            .map_err(|_| ContractError::publish(&self.name, "", "record buffer poisoned"))
    }

    /// Copy of everything recorded so far, in publish order.
    pub fn records(&self) -> Vec<Recorded> {
        self.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Recorded packets for one topic.
    pub fn packets_on(&self, topic: &str) -> Vec<SensorPacket> {
        self.records()
            .into_iter()
            .filter(|r| r.topic == topic)
            .map(|r| r.packet)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all records, returning them.
    pub fn drain(&self) -> Vec<Recorded> {
        self.lock().map(|mut r| std::mem::take(&mut *r)).unwrap_or_default()
    }

    pub fn stats(&self) -> &PublishStats {
        &self.stats
    }
}

impl Publisher for MemoryPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    fn publish(&self, topic: &str, packet: SensorPacket) -> Result<(), ContractError> {
        let bytes = packet.payload.byte_len();
        let mut records = self.lock()?;

        if self.capacity.is_some_and(|cap| records.len() >= cap) {
            self.stats.record(&self.name, topic, bytes, false);
            return Err(ContractError::publish(
                &self.name,
                topic,
                format!("capacity of {} packets reached", records.len()),
            ));
        }

        debug!(publisher = %self.name, topic = %topic, frame_id = packet.frame_id, "packet recorded");
        records.push(Recorded {
            topic: topic.to_string(),
            packet,
        });
        self.stats.record(&self.name, topic, bytes, true);
        Ok(())
    }
}
