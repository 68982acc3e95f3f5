//! Integration module for connecting inference backends with the decoder,
//! tracker and distance estimator.

mod detector;
mod pipeline;

pub use detector::{InferenceOutput, InferenceSource};
pub use pipeline::{PerceptionPipeline, PipelineConfig, RangedObject};
