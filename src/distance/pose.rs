//! Camera mounting models and ground-plane ray intersection.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::RangeUnavailable;

/// Camera pose relative to the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CameraPose {
    /// Y-up world, camera rotated about its own X axis only.
    /// Positive pitch tilts the camera down.
    PitchOnly { height: f64, pitch_deg: f64 },
    /// Z-up world (ground is `z = 0`), camera-to-world rotation
    /// `Rz(yaw) * Ry(pitch) * Rx(roll)`. Position in metres.
    FullPose {
        x: f64,
        y: f64,
        z: f64,
        yaw_deg: f64,
        pitch_deg: f64,
        roll_deg: f64,
    },
}

impl CameraPose {
    /// Height of the camera above the ground plane.
    pub fn height(&self) -> f64 {
        match *self {
            CameraPose::PitchOnly { height, .. } => height,
            CameraPose::FullPose { z, .. } => z,
        }
    }

    /// World-frame direction of the camera ray `(xn, yn, 1)`, plus the
    /// signed component of it along the world up axis.
    fn world_ray(&self, xn: f64, yn: f64) -> (Vector3<f64>, f64) {
        match *self {
            CameraPose::PitchOnly { pitch_deg, .. } => {
                let (sinp, cosp) = pitch_deg.to_radians().sin_cos();
                let d = Vector3::new(xn, -cosp * yn - sinp, -sinp * yn + cosp);
                (d, d.y)
            }
            CameraPose::FullPose {
                yaw_deg,
                pitch_deg,
                roll_deg,
                ..
            } => {
                let r_c2w = Rotation3::from_euler_angles(
                    roll_deg.to_radians(),
                    pitch_deg.to_radians(),
                    yaw_deg.to_radians(),
                );
                let d = r_c2w * Vector3::new(xn, yn, 1.0);
                (d, d.z)
            }
        }
    }

    /// Euclidean distance from the camera to where the normalized ray
    /// `(xn, yn, 1)` meets the ground plane.
    pub fn ground_distance(&self, xn: f64, yn: f64) -> Result<f64, RangeUnavailable> {
        let h = self.height();
        if h.is_nan() || h <= 0.0 {
            return Err(RangeUnavailable::NonPositiveHeight);
        }
        let (d, d_up) = self.world_ray(xn, yn);
        // Must be heading down to hit the ground.
        if d_up.is_nan() || d_up >= 0.0 {
            return Err(RangeUnavailable::RayMissesGround);
        }
        let t = -h / d_up;
        Ok(t * d.norm())
    }
}
