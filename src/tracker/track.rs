//! Single object track.

use crate::detection::{Detection, Rect, TrackedDetection};
use crate::tracker::kalman_filter::{KalmanFilter, KalmanState};
use crate::tracker::track_state::TrackState;

/// Predicted boxes never shrink below one pixel.
const MIN_PREDICTED_SIZE: f32 = 1.0;

/// Single object track.
#[derive(Debug, Clone)]
pub(crate) struct Track {
    /// Unique track identifier
    pub track_id: u64,
    /// Current track state
    pub state: TrackState,
    /// Consecutive frames without an associated detection
    pub lost_frame_count: u32,
    /// Kalman filter state
    pub kalman: KalmanState,
    /// Box used for association: the prediction, or the detection once matched
    pub bbox: Rect,
    /// Last associated detection, source of score and class id
    pub detection: Detection,
    /// Frame the track was born in
    pub start_frame: u64,
}

impl Track {
    /// Create a new track from an unmatched detection.
    pub fn new(track_id: u64, detection: Detection, kalman_filter: &KalmanFilter, frame_id: u64) -> Self {
        Self {
            track_id,
            state: TrackState::New,
            lost_frame_count: 0,
            kalman: kalman_filter.initiate(&detection.bbox),
            bbox: detection.bbox,
            detection,
            start_frame: frame_id,
        }
    }

    pub fn predict(&mut self, kalman_filter: &KalmanFilter) {
        kalman_filter.predict(&mut self.kalman);
        let predicted = self.kalman.rect();
        self.bbox = Rect::new(
            predicted.x,
            predicted.y,
            predicted.width.max(MIN_PREDICTED_SIZE),
            predicted.height.max(MIN_PREDICTED_SIZE),
        );
    }

    pub fn update(&mut self, detection: &Detection, kalman_filter: &KalmanFilter) {
        kalman_filter.update(&mut self.kalman, &detection.bbox);
        self.bbox = detection.bbox;
        self.detection = *detection;
        self.lost_frame_count = 0;
        self.state = TrackState::Tracked;
    }

    pub fn mark_lost(&mut self) {
        self.lost_frame_count += 1;
        self.state = TrackState::Lost;
    }

    pub fn is_matched(&self) -> bool {
        self.lost_frame_count == 0
    }

    pub fn to_tracked_detection(&self) -> TrackedDetection {
        TrackedDetection::new(
            Detection::from_rect(self.bbox, self.detection.score, self.detection.class_id),
            self.track_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let kf = KalmanFilter::new();
        let det = Detection::new(10.0, 10.0, 20.0, 40.0, 0.9, 1);
        let mut track = Track::new(7, det, &kf, 1);
        assert_eq!(track.state, TrackState::New);
        assert!(track.is_matched());

        track.predict(&kf);
        track.mark_lost();
        assert_eq!(track.state, TrackState::Lost);
        assert_eq!(track.lost_frame_count, 1);

        let next = Detection::new(12.0, 10.0, 20.0, 40.0, 0.4, 1);
        track.predict(&kf);
        track.update(&next, &kf);
        assert_eq!(track.state, TrackState::Tracked);
        assert_eq!(track.lost_frame_count, 0);

        let out = track.to_tracked_detection();
        assert_eq!(out.track_id, 7);
        assert_eq!(out.detection, next);
    }

    #[test]
    fn test_predicted_box_keeps_minimum_size() {
        let kf = KalmanFilter::new();
        let mut track = Track::new(1, Detection::new(0.0, 0.0, 0.2, 0.2, 0.9, 0), &kf, 1);
        track.predict(&kf);
        assert_eq!(track.bbox.width, MIN_PREDICTED_SIZE);
        assert_eq!(track.bbox.height, MIN_PREDICTED_SIZE);
    }
}
