//! Ground-plane distance estimation over atomically published configuration.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::detection::Detection;
use crate::distance::calibration::CalibrationParams;
use crate::distance::letterbox::{LetterboxObserver, LetterboxParams};
use crate::distance::pose::CameraPose;
use crate::error::RangeUnavailable;

/// Immutable view of everything the estimator needs for one call.
///
/// Each publish produces a new snapshot with a higher `version`; readers
/// never see a partially updated one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimatorSnapshot {
    pub version: u64,
    pub calibration: Option<CalibrationParams>,
    pub letterbox: Option<LetterboxParams>,
    /// Dedicated pose; falls back to the calibration's legacy mount when unset
    pub pose: Option<CameraPose>,
}

impl EstimatorSnapshot {
    /// The pose in effect: the dedicated one, else the calibration mount.
    pub fn effective_pose(&self) -> Option<CameraPose> {
        self.pose
            .or_else(|| self.calibration.map(|c| c.legacy_pose()))
    }

    /// Distance in metres from the camera to the ground point under the
    /// bottom-center of `detection`'s box.
    pub fn distance_to(&self, detection: &Detection) -> Result<f64, RangeUnavailable> {
        let cal = self.calibration.ok_or(RangeUnavailable::MissingCalibration)?;
        let lb = self.letterbox.ok_or(RangeUnavailable::MissingLetterbox)?;
        if lb.scale.is_nan() || lb.scale <= 0.0 {
            return Err(RangeUnavailable::NonPositiveScale);
        }

        let (u_m, v_m) = detection.bbox.bottom_center();
        let (u, v) = lb.to_source(u_m, v_m);
        let (xn, yn) = cal
            .undistort_point(u as f64, v as f64)
            .ok_or(RangeUnavailable::NonPositiveFocalLength)?;

        let pose = self
            .effective_pose()
            .ok_or(RangeUnavailable::MissingCalibration)?;
        pose.ground_distance(xn, yn)
    }
}

/// Converts tracked boxes into metric distances.
///
/// Calibration, letterbox and pose are pushed by other threads; each push
/// swaps in a whole new [`EstimatorSnapshot`]. Share it as
/// `Arc<DistanceEstimator>`.
#[derive(Debug, Default)]
pub struct DistanceEstimator {
    snapshot: RwLock<Arc<EstimatorSnapshot>>,
}

impl DistanceEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration currently in effect.
    pub fn snapshot(&self) -> Arc<EstimatorSnapshot> {
        // A poisoned lock still guards a complete Arc.
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn set_calibration(&self, calibration: CalibrationParams) {
        self.publish(|s| s.calibration = Some(calibration));
    }

    pub fn set_letterbox(&self, letterbox: LetterboxParams) {
        self.publish(|s| s.letterbox = Some(letterbox));
    }

    /// Set the dedicated camera pose. It takes precedence over the legacy
    /// mount stored with the calibration.
    pub fn set_pose(&self, pose: CameraPose) {
        self.publish(|s| s.pose = Some(pose));
    }

    /// Go back to the calibration's legacy mount.
    pub fn clear_pose(&self) {
        self.publish(|s| s.pose = None);
    }

    fn publish(&self, edit: impl FnOnce(&mut EstimatorSnapshot)) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = EstimatorSnapshot::clone(&guard);
        edit(&mut next);
        next.version += 1;
        debug!(version = next.version, "estimator configuration published");
        *guard = Arc::new(next);
    }

    /// Like [`estimate`](Self::estimate), but says why no distance exists.
    pub fn try_estimate<D: AsRef<Detection>>(&self, detection: D) -> Result<f64, RangeUnavailable> {
        self.snapshot().distance_to(detection.as_ref())
    }

    /// Distance in metres to the object's ground contact point, or NaN when
    /// calibration or letterbox are missing or the geometry is invalid.
    pub fn estimate<D: AsRef<Detection>>(&self, detection: D) -> f32 {
        match self.try_estimate(detection) {
            Ok(distance) => distance as f32,
            Err(reason) => {
                trace!(%reason, "distance unavailable");
                f32::NAN
            }
        }
    }
}

impl LetterboxObserver for DistanceEstimator {
    fn on_letterbox_computed(&self, params: LetterboxParams) {
        self.set_letterbox(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::calibration::Distortion;

    fn calibration() -> CalibrationParams {
        CalibrationParams::new(600.0, 600.0, 256.0, 256.0, Distortion::default())
            .with_mount(1.5, 10.0)
    }

    #[test]
    fn test_versions_increase_per_publish() {
        let est = DistanceEstimator::new();
        assert_eq!(est.snapshot().version, 0);
        est.set_calibration(calibration());
        est.on_letterbox_computed(LetterboxParams::new(1.0, 0.0, 0.0, 512, 512));
        let snap = est.snapshot();
        assert_eq!(snap.version, 2);
        assert!(snap.calibration.is_some() && snap.letterbox.is_some());
    }

    #[test]
    fn test_old_snapshot_is_unaffected_by_publish() {
        let est = DistanceEstimator::new();
        est.set_calibration(calibration());
        let before = est.snapshot();
        est.set_pose(CameraPose::PitchOnly {
            height: 2.0,
            pitch_deg: 5.0,
        });
        assert_eq!(before.pose, None);
        assert!(est.snapshot().pose.is_some());
    }

    #[test]
    fn test_effective_pose_prefers_dedicated() {
        let est = DistanceEstimator::new();
        est.set_calibration(calibration());
        assert_eq!(est.snapshot().effective_pose(), Some(calibration().legacy_pose()));

        let full = CameraPose::FullPose {
            x: 0.0,
            y: 0.0,
            z: 1.0,
            yaw_deg: 0.0,
            pitch_deg: 180.0,
            roll_deg: 0.0,
        };
        est.set_pose(full);
        assert_eq!(est.snapshot().effective_pose(), Some(full));
        est.clear_pose();
        assert_eq!(est.snapshot().effective_pose(), Some(calibration().legacy_pose()));
    }

    #[test]
    fn test_distance_uses_effective_pose() {
        let est = DistanceEstimator::new();
        est.set_calibration(calibration());
        est.set_letterbox(LetterboxParams::new(1.0, 0.0, 0.0, 512, 512));
        let det = Detection::new(200.0, 300.0, 50.0, 80.0, 0.9, 0);

        let pose = CameraPose::PitchOnly {
            height: 2.5,
            pitch_deg: 20.0,
        };
        est.set_pose(pose);
        let snap = est.snapshot();
        let (u, v) = det.bbox.bottom_center();
        let (xn, yn) = calibration().undistort_point(u as f64, v as f64).unwrap();
        assert_eq!(snap.effective_pose(), Some(pose));
        assert_eq!(snap.distance_to(&det), pose.ground_distance(xn, yn));

        est.clear_pose();
        let legacy = calibration().legacy_pose();
        assert_eq!(est.try_estimate(det), legacy.ground_distance(xn, yn));
    }

    #[test]
    fn test_reports_reason() {
        let est = DistanceEstimator::new();
        let det = Detection::new(200.0, 300.0, 50.0, 80.0, 0.9, 0);
        assert_eq!(est.try_estimate(det), Err(RangeUnavailable::MissingCalibration));
        est.set_calibration(calibration());
        assert_eq!(est.try_estimate(det), Err(RangeUnavailable::MissingLetterbox));
        est.set_letterbox(LetterboxParams::new(0.0, 0.0, 0.0, 640, 480));
        assert_eq!(est.try_estimate(det), Err(RangeUnavailable::NonPositiveScale));
        assert!(est.estimate(det).is_nan());
    }
}
