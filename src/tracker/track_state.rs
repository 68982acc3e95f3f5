/// Track state enumeration for object tracking lifecycle.
///
/// `New -> Tracked -> Lost -> (Tracked | Removed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Born this frame from an unmatched high-confidence detection
    #[default]
    New,
    /// Matched to a detection this frame
    Tracked,
    /// Coasting on prediction alone
    Lost,
    /// Unmatched for longer than the lost-frame budget. Terminal: the
    /// tracker drops such a track in the same update, so it never shows up
    /// in `MotionTracker::tracks`.
    Removed,
}
