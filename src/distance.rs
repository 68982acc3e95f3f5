//! Ground-plane back-projection from a tracked box to a metric distance.
//!
//! The bottom-center of a box is mapped back through the letterbox to a
//! sensor pixel, undistorted into a camera ray, rotated into the world frame
//! and intersected with the ground. Only meaningful for objects whose box
//! bottom actually touches the ground.

mod calibration;
mod estimator;
mod letterbox;
mod pose;

pub use calibration::{CalibrationParams, Distortion};
pub use estimator::{DistanceEstimator, EstimatorSnapshot};
pub use letterbox::{LetterboxObserver, LetterboxParams};
pub use pose::CameraPose;
