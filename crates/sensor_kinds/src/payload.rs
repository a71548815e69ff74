//! Synthetic payloads
//!
//! Deterministic for a given configuration, pose and frame number.

use bytes::Bytes;
use contracts::{
    GnssData, ImageData, ImageFormat, ImuData, PointCloudData, Pose, RadarData, SensorPayload,
    SensorType, Vector3,
};
use nalgebra::Vector3 as Vec3;

use crate::mock::MockConfig;

const GRAVITY: f64 = 9.81;
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Bytes per lidar point (x, y, z, intensity as f32)
pub const POINT_STRIDE: u32 = 16;
/// Bytes per radar detection (velocity, azimuth, altitude, depth as f32)
pub const DETECTION_STRIDE: u32 = 16;

pub fn build(sensor_type: SensorType, config: &MockConfig, pose: &Pose, frame_id: u64) -> SensorPayload {
    match sensor_type {
        SensorType::Camera => {
            let size = config.image_width as usize * config.image_height as usize * 4;
            SensorPayload::Image(ImageData {
                width: config.image_width,
                height: config.image_height,
                format: ImageFormat::Bgra8,
                data: Bytes::from(vec![(frame_id % 256) as u8; size]),
            })
        }
        SensorType::Lidar => SensorPayload::PointCloud(PointCloudData {
            num_points: config.lidar_points,
            point_stride: POINT_STRIDE,
            data: Bytes::from(vec![0u8; buffer_len(config.lidar_points, POINT_STRIDE)]),
        }),
        SensorType::Imu => SensorPayload::Imu(imu(pose)),
        SensorType::Gnss => SensorPayload::Gnss(gnss(config, pose)),
        SensorType::Radar => SensorPayload::Radar(RadarData {
            num_detections: config.radar_detections,
            data: Bytes::from(vec![0u8; buffer_len(config.radar_detections, DETECTION_STRIDE)]),
        }),
    }
}

/// Byte length of `count` fixed-size records, computed in `usize`.
fn buffer_len(count: u32, stride: u32) -> usize {
    count as usize * stride as usize
}

/// Static IMU: gravity expressed in the sensor frame, no rotation rate.
fn imu(pose: &Pose) -> ImuData {
    let gravity = pose.rotation.inverse_transform_vector(&Vec3::new(0.0, 0.0, GRAVITY));
    let (_, _, yaw) = pose.rotation.euler_angles();

    ImuData {
        accelerometer: Vector3 {
            x: gravity.x,
            y: gravity.y,
            z: gravity.z,
        },
        gyroscope: Vector3::default(),
        compass: yaw.rem_euclid(std::f64::consts::TAU),
    }
}

/// Flat-earth projection of the pose translation around the configured origin.
fn gnss(config: &MockConfig, pose: &Pose) -> GnssData {
    let offset = pose.translation.vector;
    let latitude = config.origin_latitude + offset.y / METERS_PER_DEGREE;
    let longitude = config.origin_longitude
        + offset.x / (METERS_PER_DEGREE * config.origin_latitude.to_radians().cos());

    GnssData {
        latitude,
        longitude,
        altitude: config.origin_altitude + offset.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::parse_pose;

    #[test]
    fn test_camera_size() {
        let config = MockConfig {
            image_width: 4,
            image_height: 2,
            ..Default::default()
        };
        let payload = build(SensorType::Camera, &config, &Pose::identity(), 1);
        assert_eq!(payload.byte_len(), 32);
    }

    #[test]
    fn test_buffer_len_does_not_overflow_u32() {
        assert_eq!(buffer_len(300_000_000, POINT_STRIDE), 4_800_000_000);
        assert_eq!(buffer_len(u32::MAX, DETECTION_STRIDE), u32::MAX as usize * 16);
    }

    #[test]
    fn test_lidar_and_radar_sizes() {
        let config = MockConfig {
            lidar_points: 8,
            radar_detections: 3,
            ..Default::default()
        };
        let lidar = build(SensorType::Lidar, &config, &Pose::identity(), 1);
        assert_eq!(lidar.byte_len(), 8 * POINT_STRIDE as usize);

        let radar = build(SensorType::Radar, &config, &Pose::identity(), 1);
        assert_eq!(radar.byte_len(), 3 * DETECTION_STRIDE as usize);
    }

    #[test]
    fn test_level_imu_sees_gravity_on_z() {
        let SensorPayload::Imu(imu) = build(SensorType::Imu, &MockConfig::default(), &Pose::identity(), 1)
        else {
            panic!("expected imu payload");
        };
        assert!((imu.accelerometer.z - GRAVITY).abs() < 1e-12);
        assert!(imu.accelerometer.x.abs() < 1e-12);
    }

    #[test]
    fn test_rolled_imu_sees_gravity_on_y() {
        let pose = parse_pose("0 0 0 1.5707963267948966 0 0").unwrap();
        let SensorPayload::Imu(imu) = build(SensorType::Imu, &MockConfig::default(), &pose, 1) else {
            panic!("expected imu payload");
        };
        assert!((imu.accelerometer.y.abs() - GRAVITY).abs() < 1e-9);
        assert!(imu.accelerometer.z.abs() < 1e-9);
    }

    #[test]
    fn test_gnss_follows_translation() {
        let config = MockConfig::default();
        let pose = parse_pose("0 111320 5 0 0 0").unwrap();
        let SensorPayload::Gnss(fix) = build(SensorType::Gnss, &config, &pose, 1) else {
            panic!("expected gnss payload");
        };
        assert!((fix.latitude - (config.origin_latitude + 1.0)).abs() < 1e-9);
        assert!((fix.longitude - config.origin_longitude).abs() < 1e-9);
        assert!((fix.altitude - (config.origin_altitude + 5.0)).abs() < 1e-9);
    }
}
