mod decoder;
pub mod nms;
mod rect;
mod types;

pub use decoder::{DecoderConfig, YoloDecoder};
pub use rect::{Rect, iou_batch};
pub use types::{Detection, TrackedDetection};
