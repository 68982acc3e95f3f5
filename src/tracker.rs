mod kalman_filter;
mod matching;
mod motion_tracker;
mod track;
mod track_state;

pub use kalman_filter::{KalmanFilter, KalmanState};
pub use matching::{AssignmentResult, greedy_assignment};
pub use motion_tracker::{MotionTracker, TrackView, TrackerConfig};
pub use track_state::TrackState;
