use serde::{Deserialize, Serialize};

use crate::detection::rect::Rect;

/// A single decoded object in model-input pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in TLWH format
    pub bbox: Rect,
    /// Detection confidence score in `[0, 1]`
    pub score: f32,
    /// Index of the best-scoring class
    pub class_id: usize,
}

impl Detection {
    pub fn new(x: f32, y: f32, width: f32, height: f32, score: f32, class_id: usize) -> Self {
        Self {
            bbox: Rect::new(x, y, width, height),
            score,
            class_id,
        }
    }

    pub fn from_rect(bbox: Rect, score: f32, class_id: usize) -> Self {
        Self {
            bbox,
            score,
            class_id,
        }
    }
}

impl AsRef<Detection> for Detection {
    fn as_ref(&self) -> &Detection {
        self
    }
}

/// A [`Detection`] carrying the id of the track it was associated with.
///
/// Ids are unique within one `MotionTracker` and strictly increase in
/// creation order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedDetection {
    pub detection: Detection,
    pub track_id: u64,
}

impl TrackedDetection {
    pub fn new(detection: Detection, track_id: u64) -> Self {
        Self {
            detection,
            track_id,
        }
    }

    #[inline]
    pub fn bbox(&self) -> Rect {
        self.detection.bbox
    }
}

impl AsRef<Detection> for TrackedDetection {
    fn as_ref(&self) -> &Detection {
        &self.detection
    }
}
