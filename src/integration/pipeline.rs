//! PerceptionPipeline for chaining decoding, tracking and ranging.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::detection::{DecoderConfig, Detection, YoloDecoder};
use crate::distance::{DistanceEstimator, LetterboxObserver};
use crate::error::{DecodeError, PipelineError};
use crate::tracker::{MotionTracker, TrackerConfig};

use super::{InferenceOutput, InferenceSource};

/// Configuration for the [`PerceptionPipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Side of the square model input, in pixels
    pub model_input_size: u32,
    pub decoder: DecoderConfig,
    /// Run the motion tracker; when off, raw detections are ranged directly
    pub tracking_enabled: bool,
    pub tracker: TrackerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_input_size: 512,
            decoder: DecoderConfig::default(),
            tracking_enabled: true,
            tracker: TrackerConfig::default(),
        }
    }
}

/// One object of a processed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedObject {
    pub detection: Detection,
    /// Present when tracking is enabled
    pub track_id: Option<u64>,
    /// Metres to the ground contact point; NaN when unavailable
    pub distance_m: f32,
}

/// Runs one frame through `source -> decoder -> tracker -> estimator`.
///
/// Frames must be fed sequentially. The estimator is shared so calibration
/// and pose can be published from another thread while frames are processed.
pub struct PerceptionPipeline<S: InferenceSource> {
    source: S,
    decoder: YoloDecoder,
    tracker: Option<MotionTracker>,
    estimator: Arc<DistanceEstimator>,
    model_input_size: u32,
}

impl<S: InferenceSource> PerceptionPipeline<S> {
    /// Create a new pipeline with its own estimator.
    pub fn new(source: S, config: PipelineConfig) -> Result<Self, DecodeError> {
        Self::with_estimator(source, config, Arc::new(DistanceEstimator::new()))
    }

    /// Create a new pipeline ranging with an existing, shared estimator.
    pub fn with_estimator(
        source: S,
        config: PipelineConfig,
        estimator: Arc<DistanceEstimator>,
    ) -> Result<Self, DecodeError> {
        if config.model_input_size == 0 {
            return Err(DecodeError::InvalidInputSize(0));
        }
        Ok(Self {
            source,
            decoder: YoloDecoder::new(config.decoder)?,
            tracker: config
                .tracking_enabled
                .then(|| MotionTracker::new(config.tracker)),
            estimator,
            model_input_size: config.model_input_size,
        })
    }

    /// Run inference on one frame and return its ranged objects.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<RangedObject>, PipelineError<S::Error>> {
        let output = self
            .source
            .infer(input, width, height)
            .map_err(PipelineError::Source)?;
        Ok(self.process_output(&output)?)
    }

    /// Decode, track and range an already computed model output.
    ///
    /// A decode failure drops the frame without touching tracker state.
    pub fn process_output(&mut self, output: &InferenceOutput) -> Result<Vec<RangedObject>, DecodeError> {
        if let Some(letterbox) = output.letterbox {
            self.estimator.on_letterbox_computed(letterbox);
        }

        let detections = self
            .decoder
            .decode(&output.tensor, self.model_input_size)
            .inspect_err(|e| warn!("dropping frame: {e}"))?;

        let objects = match self.tracker.as_mut() {
            Some(tracker) => tracker
                .update(&detections)
                .into_iter()
                .map(|t| RangedObject {
                    detection: t.detection,
                    track_id: Some(t.track_id),
                    distance_m: self.estimator.estimate(t),
                })
                .collect(),
            None => detections
                .into_iter()
                .map(|d| RangedObject {
                    detection: d,
                    track_id: None,
                    distance_m: self.estimator.estimate(d),
                })
                .collect(),
        };
        Ok(objects)
    }

    /// Shared handle to the estimator, for calibration publishers.
    pub fn estimator(&self) -> &Arc<DistanceEstimator> {
        &self.estimator
    }

    /// Get a reference to the underlying inference source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying inference source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn decoder(&self) -> &YoloDecoder {
        &self.decoder
    }

    /// The tracker, when tracking is enabled.
    pub fn tracker(&self) -> Option<&MotionTracker> {
        self.tracker.as_ref()
    }
}
