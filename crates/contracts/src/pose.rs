//! Pose - 3D rigid transform of a sensor in its parent frame
//!
//! Text form follows scene-description convention: `"x y z roll pitch yaw"`,
//! metres and radians, whitespace separated.

use nalgebra::{Isometry3, Translation3, UnitQuaternion};

use crate::ContractError;

/// Sensor pose (translation + orientation).
pub type Pose = Isometry3<f64>;

/// Parse `"x y z roll pitch yaw"` into a pose.
///
/// # Errors
/// `MalformedField` if the text does not hold exactly six finite numbers.
pub fn parse_pose(text: &str) -> Result<Pose, ContractError> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    ContractError::malformed_field("pose", text, format!("'{token}' is not a finite number"))
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let [x, y, z, roll, pitch, yaw] = values.as_slice() else {
        return Err(ContractError::malformed_field(
            "pose",
            text,
            format!("expected 6 values (x y z roll pitch yaw), got {}", values.len()),
        ));
    };

    Ok(Isometry3::from_parts(
        Translation3::new(*x, *y, *z),
        UnitQuaternion::from_euler_angles(*roll, *pitch, *yaw),
    ))
}

/// Render a pose back to `"x y z roll pitch yaw"`.
pub fn format_pose(pose: &Pose) -> String {
    let t = pose.translation.vector;
    let (roll, pitch, yaw) = pose.rotation.euler_angles();
    // `+ 0.0` turns -0.0 into 0.0
    let [x, y, z, roll, pitch, yaw] = [t.x, t.y, t.z, roll, pitch, yaw].map(|v| v + 0.0);
    format!("{x} {y} {z} {roll} {pitch} {yaw}")
}
