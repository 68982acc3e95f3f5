//! Two-stage ByteTrack-style association with Kalman motion prediction.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::detection::{Detection, Rect, TrackedDetection};
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::track::Track;
use crate::tracker::track_state::TrackState;

/// Configuration for the [`MotionTracker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum score for first-stage association and for spawning tracks
    pub high_thresh: f32,
    /// Minimum score for second-stage association
    pub low_thresh: f32,
    /// IoU a detection must exceed to match a predicted track box
    pub iou_threshold: f32,
    /// Consecutive unmatched frames a track survives
    pub max_lost_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            high_thresh: 0.5,
            low_thresh: 0.1,
            iou_threshold: 0.3,
            max_lost_frames: 30,
        }
    }
}

/// Read-only snapshot of one live track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackView {
    pub track_id: u64,
    pub state: TrackState,
    pub lost_frame_count: u32,
    /// Frame the track was born in
    pub start_frame: u64,
    /// Current association box (prediction while coasting)
    pub bbox: Rect,
    pub score: f32,
    pub class_id: usize,
}

/// Multi-object tracker.
///
/// Call [`update`](Self::update) exactly once per frame, in frame order.
/// Track ids start at 1, strictly increase and are never reused by one
/// tracker instance.
#[derive(Debug, Clone)]
pub struct MotionTracker {
    tracks: Vec<Track>,
    next_id: u64,
    frame_id: u64,
    config: TrackerConfig,
    kalman_filter: KalmanFilter,
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl MotionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
            frame_id: 0,
            config,
            kalman_filter: KalmanFilter::default(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_id
    }

    /// Every live track, matched or coasting, in creation order.
    pub fn tracks(&self) -> Vec<TrackView> {
        self.tracks
            .iter()
            .map(|t| TrackView {
                track_id: t.track_id,
                state: t.state,
                lost_frame_count: t.lost_frame_count,
                start_frame: t.start_frame,
                bbox: t.bbox,
                score: t.detection.score,
                class_id: t.detection.class_id,
            })
            .collect()
    }

    /// Associate one frame of detections and return the tracks matched in it.
    ///
    /// Tracks that are only coasting on their prediction stay alive for
    /// later re-matching but are not part of the output.
    pub fn update(&mut self, detections: &[Detection]) -> Vec<TrackedDetection> {
        self.frame_id += 1;

        // Step 1: Split detections into high-score and low-score
        let mut detections_high = Vec::new();
        let mut detections_low = Vec::new();
        for det in detections {
            if det.score >= self.config.high_thresh {
                detections_high.push(*det);
            } else if det.score >= self.config.low_thresh {
                detections_low.push(*det);
            }
        }

        // Step 2: Predict every live track forward one frame
        for track in self.tracks.iter_mut() {
            track.predict(&self.kalman_filter);
        }

        // Step 3: First association, with high score detections
        let track_rects: Vec<Rect> = self.tracks.iter().map(|t| t.bbox).collect();
        let high_rects: Vec<Rect> = detections_high.iter().map(|d| d.bbox).collect();
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&track_rects, &high_rects, self.config.iou_threshold);

        let num_first = matches.len();
        for (itracked, idet) in matches {
            self.tracks[itracked].update(&detections_high[idet], &self.kalman_filter);
        }

        // Step 4: Second association, leftover tracks with low score detections
        let r_rects: Vec<Rect> = unmatched_tracks.iter().map(|&i| track_rects[i]).collect();
        let low_rects: Vec<Rect> = detections_low.iter().map(|d| d.bbox).collect();
        let AssignmentResult {
            matches: matches_second,
            unmatched_tracks: unmatched_tracks_second,
            ..
        } = matching::greedy_assignment(&r_rects, &low_rects, self.config.iou_threshold);

        let num_second = matches_second.len();
        for (itracked, idet) in matches_second {
            let track = &mut self.tracks[unmatched_tracks[itracked]];
            track.update(&detections_low[idet], &self.kalman_filter);
        }

        for idx in unmatched_tracks_second {
            self.tracks[unmatched_tracks[idx]].mark_lost();
        }

        // Step 5: Drop tracks lost for too long
        let max_lost = self.config.max_lost_frames;
        self.tracks.retain(|track| {
            if track.lost_frame_count > max_lost {
                debug!(
                    track_id = track.track_id,
                    age = track.lost_frame_count,
                    "track removed"
                );
                false
            } else {
                true
            }
        });

        // Step 6: Init new tracks from unmatched high score detections
        for idet in unmatched_detections {
            let track_id = self.next_id;
            self.next_id += 1;
            debug!(track_id, frame = self.frame_id, "track born");
            self.tracks.push(Track::new(
                track_id,
                detections_high[idet],
                &self.kalman_filter,
                self.frame_id,
            ));
        }

        trace!(
            frame = self.frame_id,
            high = detections_high.len(),
            low = detections_low.len(),
            first_stage = num_first,
            second_stage = num_second,
            live = self.tracks.len(),
            "tracker update"
        );

        self.tracks
            .iter()
            .filter(|t| t.is_matched())
            .map(Track::to_tracked_detection)
            .collect()
    }
}
