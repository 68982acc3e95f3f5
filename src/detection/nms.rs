//! Greedy non-maximum suppression.

use crate::detection::Detection;
use crate::detection::rect::{Rect, iou_batch};

/// Class-agnostic greedy NMS.
///
/// Boxes are visited in descending score order (ties keep input order) and a
/// box is dropped when its IoU with an already kept box exceeds
/// `iou_threshold`, whatever the class ids. The result is sorted by score,
/// highest first, and contains no pair overlapping beyond the threshold, so
/// running it again on its own output is a no-op.
pub fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    if detections.len() < 2 {
        return detections;
    }

    // Stable: equal scores keep their decode order.
    detections.sort_by(|a, b| b.score.total_cmp(&a.score));

    let rects: Vec<Rect> = detections.iter().map(|d| d.bbox).collect();
    let ious = iou_batch(&rects, &rects);

    let mut suppressed = vec![false; detections.len()];
    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        for j in (i + 1)..detections.len() {
            if !suppressed[j] && ious[[i, j]] > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    detections
        .into_iter()
        .zip(suppressed)
        .filter_map(|(d, s)| (!s).then_some(d))
        .collect()
}
