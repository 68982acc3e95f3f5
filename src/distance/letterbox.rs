use serde::{Deserialize, Serialize};

/// Uniform scale plus centered padding that fits a source frame into the
/// square model input.
///
/// `model = source * scale + pad` and `source = (model - pad) / scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LetterboxParams {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub source_width: u32,
    pub source_height: u32,
}

impl LetterboxParams {
    pub fn new(scale: f32, pad_x: f32, pad_y: f32, source_width: u32, source_height: u32) -> Self {
        Self {
            scale,
            pad_x,
            pad_y,
            source_width,
            source_height,
        }
    }

    /// Parameters for letterboxing a `source_width x source_height` frame into
    /// an `input_size` square. `None` for empty frames or inputs.
    pub fn compute(source_width: u32, source_height: u32, input_size: u32) -> Option<Self> {
        if source_width == 0 || source_height == 0 || input_size == 0 {
            return None;
        }
        let input = input_size as f32;
        let scale = (input / source_height as f32).min(input / source_width as f32);
        let new_w = (source_width as f32 * scale).round();
        let new_h = (source_height as f32 * scale).round();
        Some(Self {
            scale,
            pad_x: (input - new_w) / 2.0,
            pad_y: (input - new_h) / 2.0,
            source_width,
            source_height,
        })
    }

    /// Source pixel to model-input pixel.
    #[inline]
    pub fn to_model(&self, u: f32, v: f32) -> (f32, f32) {
        (u * self.scale + self.pad_x, v * self.scale + self.pad_y)
    }

    /// Model-input pixel back to source pixel.
    #[inline]
    pub fn to_source(&self, u_m: f32, v_m: f32) -> (f32, f32) {
        ((u_m - self.pad_x) / self.scale, (v_m - self.pad_y) / self.scale)
    }
}

/// Receiver of per-frame letterbox parameters from the preprocessing stage.
pub trait LetterboxObserver {
    fn on_letterbox_computed(&self, params: LetterboxParams);
}
