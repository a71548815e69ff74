//! Publisher construction from scene output settings

use std::sync::Arc;

use contracts::{OutputConfig, OutputKind, SharedPublisher};
use tracing::info;

use crate::log::LogPublisher;
use crate::memory::MemoryPublisher;
use crate::null::NullPublisher;
use crate::stats::{PublishStats, StatsSnapshot};

/// A shared publisher plus the counters it writes to.
#[derive(Clone)]
pub struct PublisherHandle {
    publisher: SharedPublisher,
    memory: Option<Arc<MemoryPublisher>>,
    stats: Arc<PublishStats>,
}

impl PublisherHandle {
    pub fn publisher(&self) -> SharedPublisher {
        self.publisher.clone()
    }

    /// The recorder behind this handle when the output kind is `memory`.
    pub fn memory(&self) -> Option<&MemoryPublisher> {
        self.memory.as_deref()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

/// Build the publisher described by `config`.
pub fn create_publisher(config: &OutputConfig) -> PublisherHandle {
    let stats = Arc::new(PublishStats::new());

    let (publisher, memory) = match config.kind {
        OutputKind::Log => {
            let publisher: SharedPublisher =
                Arc::new(LogPublisher::with_stats(&config.name, stats.clone()));
            (publisher, None)
        }
        OutputKind::Memory => {
            let memory = Arc::new(MemoryPublisher::with_stats(&config.name, None, stats.clone()));
            let publisher: SharedPublisher = memory.clone();
            (publisher, Some(memory))
        }
        OutputKind::None => {
            let publisher: SharedPublisher =
                Arc::new(NullPublisher::with_stats(&config.name, stats.clone()));
            (publisher, None)
        }
    };

    info!(publisher = %config.name, kind = ?config.kind, "publisher created");

    PublisherHandle {
        publisher,
        memory,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{SensorId, SensorPacket, SensorPayload, SensorType};

    fn packet() -> SensorPacket {
        SensorPacket {
            sensor_id: SensorId::from_raw(9),
            sensor_name: "gnss".into(),
            sensor_type: SensorType::Gnss,
            timestamp: 0.0,
            frame_id: 1,
            payload: SensorPayload::Raw(Bytes::from_static(b"1234")),
        }
    }

    #[test]
    fn test_memory_handle_exposes_recorder() {
        let handle = create_publisher(&OutputConfig {
            name: "mem".into(),
            kind: OutputKind::Memory,
        });

        handle.publisher().publish("/g", packet()).unwrap();
        assert_eq!(handle.memory().map(MemoryPublisher::len), Some(1));
        assert_eq!(handle.snapshot().packets, 1);
        assert_eq!(handle.publisher().name(), "mem");
    }

    #[test]
    fn test_null_and_log_handles_count() {
        for kind in [OutputKind::None, OutputKind::Log] {
            let handle = create_publisher(&OutputConfig {
                name: "out".into(),
                kind,
            });
            handle.publisher().publish("/g", packet()).unwrap();
            assert!(handle.memory().is_none());
            assert_eq!(handle.snapshot().bytes, 4);
        }
    }
}
