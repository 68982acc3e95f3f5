use serde::{Deserialize, Serialize};

use crate::distance::pose::CameraPose;

/// Fixed-point iterations used to invert the lens distortion model.
const UNDISTORT_ITERATIONS: usize = 5;

/// Radial (`k1, k2, k3`) and tangential (`p1, p2`) lens distortion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distortion {
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub k3: f64,
}

impl Distortion {
    pub fn new(k1: f64, k2: f64, p1: f64, p2: f64, k3: f64) -> Self {
        Self { k1, k2, p1, p2, k3 }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Pinhole intrinsics plus distortion, as produced by an offline
/// checkerboard calibration.
///
/// Also carries the legacy mount description (height and pitch) used when
/// no dedicated [`CameraPose`] has been published.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationParams {
    /// Focal length in x direction (pixels)
    pub fx: f64,
    /// Focal length in y direction (pixels)
    pub fy: f64,
    /// Principal point x coordinate (pixels)
    pub cx: f64,
    /// Principal point y coordinate (pixels)
    pub cy: f64,
    #[serde(default)]
    pub distortion: Distortion,
    /// RMS reprojection error of the calibration, informational
    #[serde(default)]
    pub rms_error: f64,
    /// Height of the camera above the ground plane, in metres
    #[serde(default = "default_camera_height")]
    pub camera_height: f64,
    /// Downward tilt of the camera in degrees
    #[serde(default)]
    pub camera_pitch_deg: f64,
}

fn default_camera_height() -> f64 {
    1.5
}

impl CalibrationParams {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64, distortion: Distortion) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            distortion,
            rms_error: 0.0,
            camera_height: default_camera_height(),
            camera_pitch_deg: 0.0,
        }
    }

    /// Set the legacy mount used for the pitch-only fallback.
    pub fn with_mount(mut self, camera_height: f64, camera_pitch_deg: f64) -> Self {
        self.camera_height = camera_height;
        self.camera_pitch_deg = camera_pitch_deg;
        self
    }

    pub fn has_valid_focal_length(&self) -> bool {
        self.fx > 0.0 && self.fy > 0.0
    }

    /// The pitch-only pose described by the legacy mount fields.
    pub fn legacy_pose(&self) -> CameraPose {
        CameraPose::PitchOnly {
            height: self.camera_height,
            pitch_deg: self.camera_pitch_deg,
        }
    }

    /// Map a distorted pixel to normalized camera coordinates `(xn, yn)`,
    /// so that `(xn, yn, 1)` is the ray through that pixel.
    ///
    /// Returns `None` when the focal lengths are not positive.
    pub fn undistort_point(&self, u: f64, v: f64) -> Option<(f64, f64)> {
        if !self.has_valid_focal_length() {
            return None;
        }
        let x0 = (u - self.cx) / self.fx;
        let y0 = (v - self.cy) / self.fy;
        if self.distortion.is_zero() {
            return Some((x0, y0));
        }

        let Distortion { k1, k2, p1, p2, k3 } = self.distortion;
        let (mut x, mut y) = (x0, y0);
        for _ in 0..UNDISTORT_ITERATIONS {
            let r2 = x * x + y * y;
            let icdist = 1.0 / (1.0 + ((k3 * r2 + k2) * r2 + k1) * r2);
            if icdist < 0.0 {
                // Model folds back on itself this far out; keep the pinhole ray.
                return Some((x0, y0));
            }
            let delta_x = 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
            let delta_y = p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;
            x = (x0 - delta_x) * icdist;
            y = (y0 - delta_y) * icdist;
        }
        Some((x, y))
    }

    /// Forward distortion model: normalized ray to pixel.
    pub fn distort_point(&self, xn: f64, yn: f64) -> (f64, f64) {
        let Distortion { k1, k2, p1, p2, k3 } = self.distortion;
        let r2 = xn * xn + yn * yn;
        let radial = 1.0 + ((k3 * r2 + k2) * r2 + k1) * r2;
        let xd = xn * radial + 2.0 * p1 * xn * yn + p2 * (r2 + 2.0 * xn * xn);
        let yd = yn * radial + p1 * (r2 + 2.0 * yn * yn) + 2.0 * p2 * xn * yn;
        (self.fx * xd + self.cx, self.fy * yd + self.cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibration(distortion: Distortion) -> CalibrationParams {
        CalibrationParams::new(600.0, 620.0, 320.0, 240.0, distortion)
    }

    #[test]
    fn test_pinhole_without_distortion() {
        let cal = calibration(Distortion::default());
        let (xn, yn) = cal.undistort_point(380.0, 302.0).unwrap();
        assert!((xn - 0.1).abs() < 1e-12);
        assert!((yn - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_focal_length() {
        let mut cal = calibration(Distortion::default());
        cal.fy = 0.0;
        assert_eq!(cal.undistort_point(10.0, 10.0), None);
    }

    #[test]
    fn test_undistort_inverts_mild_distortion() {
        let cal = calibration(Distortion::new(-0.05, 0.01, 0.001, -0.0005, 0.0));
        let (u, v) = cal.distort_point(0.12, -0.08);
        let (xn, yn) = cal.undistort_point(u, v).unwrap();
        assert!((xn - 0.12).abs() < 1e-6);
        assert!((yn + 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_legacy_pose_defaults() {
        let cal = calibration(Distortion::default());
        assert_eq!(
            cal.legacy_pose(),
            CameraPose::PitchOnly {
                height: 1.5,
                pitch_deg: 0.0
            }
        );
    }
}
