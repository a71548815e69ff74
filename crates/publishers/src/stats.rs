//! Publish counters shared between a publisher and its owner

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for a single publisher
#[derive(Debug, Default)]
pub struct PublishStats {
    packets: AtomicU64,
    bytes: AtomicU64,
    failures: AtomicU64,
}

impl PublishStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a packet and forward it to the global metrics recorder.
    pub fn record(&self, publisher: &str, topic: &str, bytes: usize, success: bool) {
        if success {
            self.packets.fetch_add(1, Ordering::Relaxed);
            self.bytes.fetch_add(bytes as u64, Ordering::Relaxed);
        } else {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        observability::record_publish(publisher, topic, bytes, success);
    }

    pub fn packets(&self) -> u64 {
        self.packets.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            packets: self.packets(),
            bytes: self.bytes(),
            failures: self.failures(),
        }
    }
}

/// Point-in-time copy of [`PublishStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub packets: u64,
    pub bytes: u64,
    pub failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let stats = PublishStats::new();
        stats.record("p", "/t", 10, true);
        stats.record("p", "/t", 6, true);
        stats.record("p", "/t", 99, false);

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                packets: 2,
                bytes: 16,
                failures: 1
            }
        );
    }
}
