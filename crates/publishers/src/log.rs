//! LogPublisher - logs a packet summary via tracing

use contracts::{ContractError, Publisher, SensorPacket, SensorPayload};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::stats::PublishStats;

/// Publisher that logs one line per packet
pub struct LogPublisher {
    name: String,
    stats: Arc<PublishStats>,
}

impl LogPublisher {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_stats(name, Arc::default())
    }

    pub(crate) fn with_stats(name: impl Into<String>, stats: Arc<PublishStats>) -> Self {
        Self {
            name: name.into(),
            stats,
        }
    }

    pub fn stats(&self) -> &PublishStats {
        &self.stats
    }
}

fn payload_kind(payload: &SensorPayload) -> &'static str {
    match payload {
        SensorPayload::Image(_) => "image",
        SensorPayload::PointCloud(_) => "point_cloud",
        SensorPayload::Imu(_) => "imu",
        SensorPayload::Gnss(_) => "gnss",
        SensorPayload::Radar(_) => "radar",
        SensorPayload::Raw(_) => "raw",
    }
}

impl Publisher for LogPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        level = "trace",
        name = "log_publisher_publish",
        skip(self, packet),
        fields(publisher = %self.name)
    )]
    fn publish(&self, topic: &str, packet: SensorPacket) -> Result<(), ContractError> {
        let bytes = packet.payload.byte_len();
        info!(
            publisher = %self.name,
            topic = %topic,
            sensor = %packet.sensor_name,
            id = %packet.sensor_id,
            frame_id = packet.frame_id,
            timestamp = packet.timestamp,
            payload = payload_kind(&packet.payload),
            bytes,
            "packet published"
        );
        self.stats.record(&self.name, topic, bytes, true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{SensorId, SensorType};

    #[test]
    fn test_log_publisher_counts() {
        let publisher = LogPublisher::new("my_logger");
        let packet = SensorPacket {
            sensor_id: SensorId::from_raw(3),
            sensor_name: "cam".into(),
            sensor_type: SensorType::Camera,
            timestamp: 0.5,
            frame_id: 1,
            payload: SensorPayload::Raw(Bytes::from_static(b"abcd")),
        };

        assert!(publisher.publish("/sensors/cam", packet).is_ok());
        assert_eq!(publisher.name(), "my_logger");
        assert_eq!(publisher.stats().packets(), 1);
        assert_eq!(publisher.stats().bytes(), 4);
    }
}
