//! SensorPacket - Output of a sensor generation cycle
//!
//! Raw sensor data packets published by concrete sensor kinds.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ContractError, SensorId, SimTime};

/// Sensor data packet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorPacket {
    /// Identifier of the producing sensor
    pub sensor_id: SensorId,

    /// Sensor name
    pub sensor_name: String,

    /// Sensor type
    pub sensor_type: SensorType,

    /// Simulation timestamp of the generation call
    pub timestamp: SimTime,

    /// Per-sensor generation counter
    pub frame_id: u64,

    /// Payload (zero-copy)
    pub payload: SensorPayload,
}

/// Sensor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SensorPayload {
    /// Image data (RGB/Depth/SemanticSeg)
    Image(ImageData),

    /// LiDAR point cloud
    PointCloud(PointCloudData),

    /// IMU data
    Imu(ImuData),

    /// GNSS data
    Gnss(GnssData),

    /// Radar data
    Radar(RadarData),

    /// Raw bytes (fallback)
    Raw(Bytes),
}

impl SensorPayload {
    /// Approximate payload size in bytes
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Image(image) => image.data.len(),
            Self::PointCloud(cloud) => cloud.data.len(),
            Self::Imu(_) => std::mem::size_of::<ImuData>(),
            Self::Gnss(_) => std::mem::size_of::<GnssData>(),
            Self::Radar(radar) => radar.data.len(),
            Self::Raw(raw) => raw.len(),
        }
    }
}

/// Image data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub data: Bytes,
}

/// Image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Rgb8,
    Rgba8,
    Bgra8,
    Depth,
    SemanticSeg,
}

/// LiDAR point cloud data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloudData {
    pub num_points: u32,

    /// Bytes per point (usually 16: x,y,z,intensity)
    pub point_stride: u32,

    pub data: Bytes,
}

/// IMU data
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImuData {
    /// Accelerometer (m/s²)
    pub accelerometer: Vector3,

    /// Gyroscope (rad/s)
    pub gyroscope: Vector3,

    /// Compass (rad)
    pub compass: f64,
}

/// GNSS data
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GnssData {
    /// Latitude (deg)
    pub latitude: f64,

    /// Longitude (deg)
    pub longitude: f64,

    /// Altitude (m)
    pub altitude: f64,
}

/// Radar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarData {
    pub num_detections: u32,
    pub data: Bytes,
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Sensor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Camera,
    Lidar,
    Imu,
    Gnss,
    Radar,
}

impl SensorType {
    pub const ALL: [SensorType; 5] = [
        SensorType::Camera,
        SensorType::Lidar,
        SensorType::Imu,
        SensorType::Gnss,
        SensorType::Radar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Lidar => "lidar",
            Self::Imu => "imu",
            Self::Gnss => "gnss",
            Self::Radar => "radar",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ContractError::UnknownSensorType {
                sensor_type: s.to_string(),
            })
    }
}
