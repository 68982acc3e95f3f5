//! YOLO detection head decoding.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detection::nms::non_max_suppression;
use crate::detection::{Detection, Rect};
use crate::error::DecodeError;

/// Number of leading box-geometry channels (cx, cy, w, h).
const BOX_CHANNELS: usize = 4;

/// Configuration for the [`YoloDecoder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Leading tensor dimension: `4 + num_classes`
    pub num_channels: usize,
    /// Trailing tensor dimension: number of candidate boxes
    pub num_boxes: usize,
    /// Minimum best-class score for a candidate to be kept
    pub conf_thresh: f32,
    /// IoU above which a lower-scoring box is suppressed
    pub nms_iou: f32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            num_channels: 12,
            num_boxes: 5376,
            conf_thresh: 0.25,
            nms_iou: 0.45,
        }
    }
}

/// Decodes a channel-major `(4 + num_classes, num_boxes)` output tensor into
/// de-duplicated detections.
///
/// Stateless after construction; `decode` may be called from any thread.
#[derive(Debug, Clone)]
pub struct YoloDecoder {
    config: DecoderConfig,
}

impl YoloDecoder {
    pub fn new(config: DecoderConfig) -> Result<Self, DecodeError> {
        if config.num_channels <= BOX_CHANNELS
            || config.num_boxes == 0
            || config.num_channels.checked_mul(config.num_boxes).is_none()
        {
            return Err(DecodeError::InvalidLayout {
                num_channels: config.num_channels,
                num_boxes: config.num_boxes,
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn num_classes(&self) -> usize {
        self.config.num_channels - BOX_CHANNELS
    }

    /// Total number of floats a valid output tensor holds.
    pub fn expected_len(&self) -> usize {
        self.config.num_channels * self.config.num_boxes
    }

    /// Decode one frame of raw model output.
    ///
    /// Every candidate whose best class score is below `conf_thresh` is
    /// dropped, the rest are scaled to `model_input_size` pixels and passed
    /// through class-agnostic NMS. Output is sorted by score, highest first.
    pub fn decode(&self, tensor: &[f32], model_input_size: u32) -> Result<Vec<Detection>, DecodeError> {
        if model_input_size == 0 {
            return Err(DecodeError::InvalidInputSize(model_input_size));
        }
        let mismatch = DecodeError::TensorSizeMismatch {
            expected: self.expected_len(),
            actual: tensor.len(),
        };
        // from_shape accepts a longer slice, so the length is checked first.
        if tensor.len() != self.expected_len() {
            return Err(mismatch);
        }
        let output = ArrayView2::from_shape((self.config.num_channels, self.config.num_boxes), tensor)
            .map_err(|_| mismatch)?;
        let input_size = model_input_size as f32;

        let mut candidates = Vec::new();
        for column in output.columns() {
            let mut best_score = f32::NEG_INFINITY;
            let mut best_class = 0;
            for (c, &score) in column.iter().skip(BOX_CHANNELS).enumerate() {
                if score > best_score {
                    best_score = score;
                    best_class = c;
                }
            }
            if best_score < self.config.conf_thresh {
                continue;
            }

            let bbox = Rect::from_cxcywh(column[0], column[1], column[2], column[3], input_size);
            candidates.push(Detection::from_rect(bbox, best_score, best_class));
        }

        let num_candidates = candidates.len();
        let kept = non_max_suppression(candidates, self.config.nms_iou);
        debug!(
            candidates = num_candidates,
            kept = kept.len(),
            "decoded detection tensor"
        );
        Ok(kept)
    }
}
