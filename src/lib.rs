//! Detection decoding, multi-object tracking and ground-plane distance
//! estimation for a monocular perception pipeline.
//!
//! Data flows `tensor -> YoloDecoder -> (optional) MotionTracker ->
//! DistanceEstimator::estimate`, one frame at a time.

pub mod detection;
pub mod distance;
pub mod error;
pub mod integration;
pub mod tracker;

pub use detection::{
    DecoderConfig, Detection, Rect, TrackedDetection, YoloDecoder,
};
pub use distance::{
    CalibrationParams, CameraPose, DistanceEstimator, Distortion, EstimatorSnapshot,
    LetterboxObserver, LetterboxParams,
};
pub use error::{DecodeError, PipelineError, RangeUnavailable};
pub use integration::{
    InferenceOutput, InferenceSource, PerceptionPipeline, PipelineConfig, RangedObject,
};
pub use tracker::{MotionTracker, TrackState, TrackView, TrackerConfig};
