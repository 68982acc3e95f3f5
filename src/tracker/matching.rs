//! Greedy IoU association between predicted tracks and detections.

use crate::detection::{Rect, iou_batch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    /// `(track index, detection index)` pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy nearest-IoU assignment.
///
/// Detections are visited in order; each takes the still-unmatched track
/// with the highest IoU strictly above `iou_threshold`, ties going to the
/// lower track index. Each track and each detection is used at most once.
/// Not a globally optimal assignment.
pub fn greedy_assignment(track_boxes: &[Rect], det_boxes: &[Rect], iou_threshold: f32) -> AssignmentResult {
    let mut track_matched = vec![false; track_boxes.len()];
    let mut result = AssignmentResult::default();

    if track_boxes.is_empty() || det_boxes.is_empty() {
        result.unmatched_tracks = (0..track_boxes.len()).collect();
        result.unmatched_detections = (0..det_boxes.len()).collect();
        return result;
    }

    let ious = iou_batch(det_boxes, track_boxes);
    for idet in 0..det_boxes.len() {
        let mut best_iou = iou_threshold;
        let mut best_track = None;
        for itrack in 0..track_boxes.len() {
            if track_matched[itrack] {
                continue;
            }
            let iou = ious[[idet, itrack]];
            if iou > best_iou {
                best_iou = iou;
                best_track = Some(itrack);
            }
        }
        match best_track {
            Some(itrack) => {
                track_matched[itrack] = true;
                result.matches.push((itrack, idet));
            }
            None => result.unmatched_detections.push(idet),
        }
    }

    result.unmatched_tracks = track_matched
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| (!m).then_some(i))
        .collect();
    result
}
