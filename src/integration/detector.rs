//! Trait for the neural-network stage feeding the pipeline.

use crate::distance::LetterboxParams;

/// Raw model output for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceOutput {
    /// Channel-major `(4 + num_classes, num_boxes)` tensor
    pub tensor: Vec<f32>,
    /// Letterbox applied while preparing this frame, if it changed
    pub letterbox: Option<LetterboxParams>,
}

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model runtime to the
/// pipeline. Preprocessing (letterboxing, normalization) happens inside the
/// implementation.
///
/// # Example
///
/// ```ignore
/// use groundtrack_rs::{InferenceOutput, InferenceSource};
///
/// struct MyModel {
///     // Your runtime session here
/// }
///
/// impl InferenceSource for MyModel {
///     type Error = std::io::Error;
///
///     fn infer(&mut self, input: &[u8], width: u32, height: u32) -> Result<InferenceOutput, Self::Error> {
///         // Letterbox, run the network, return its output tensor
///         Ok(InferenceOutput::default())
///     }
/// }
/// ```
pub trait InferenceSource {
    /// Error type for inference failures.
    type Error;

    /// Run the model on raw image data.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn infer(&mut self, input: &[u8], width: u32, height: u32) -> Result<InferenceOutput, Self::Error>;
}
