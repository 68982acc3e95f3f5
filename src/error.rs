//! Error types.

use thiserror::Error;

/// Failure to decode a raw detection tensor. Fatal for the current frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid output tensor: expected float[{expected}], got float[{actual}]")]
    TensorSizeMismatch { expected: usize, actual: usize },

    #[error(
        "invalid tensor layout: {num_channels} channels x {num_boxes} boxes \
         (need at least 4 box channels plus one class and one box)"
    )]
    InvalidLayout {
        num_channels: usize,
        num_boxes: usize,
    },

    #[error("model input size must be positive, got {0}")]
    InvalidInputSize(u32),
}

/// Failure of one [`PerceptionPipeline`](crate::PerceptionPipeline) frame.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("inference source failed: {0}")]
    Source(E),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Why a distance could not be computed. [`DistanceEstimator::estimate`]
/// collapses all of these to NaN.
///
/// [`DistanceEstimator::estimate`]: crate::DistanceEstimator::estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeUnavailable {
    #[error("no camera calibration has been published")]
    MissingCalibration,

    #[error("no letterbox parameters have been published")]
    MissingLetterbox,

    #[error("letterbox scale must be positive")]
    NonPositiveScale,

    #[error("focal lengths must be positive")]
    NonPositiveFocalLength,

    #[error("camera height must be positive")]
    NonPositiveHeight,

    #[error("ray through the box footprint does not reach the ground plane")]
    RayMissesGround,
}
