use groundtrack_rs::{Detection, MotionTracker, TrackState, TrackerConfig};

fn det(x: f32, y: f32, score: f32) -> Detection {
    Detection::new(x, y, 100.0, 100.0, score, 0)
}

#[test]
fn test_basic_tracking() {
    let mut tracker = MotionTracker::new(TrackerConfig::default());

    // Frame 1: One detection spawns a track that is emitted immediately
    let tracks1 = tracker.update(&[det(100.0, 100.0, 0.9)]);
    assert_eq!(tracks1.len(), 1);
    let id1 = tracks1[0].track_id;

    // Frame 2: Same object moved slightly
    let tracks2 = tracker.update(&[det(105.0, 105.0, 0.9)]);
    assert_eq!(tracks2.len(), 1);
    assert_eq!(tracks2[0].track_id, id1); // ID should persist

    // Frame 3: Object occluded (low score), recovered by the second association
    let tracks3 = tracker.update(&[det(110.0, 110.0, 0.2)]);
    assert_eq!(tracks3.len(), 1);
    assert_eq!(tracks3[0].track_id, id1);

    // Frame 4: Object disappears, track coasts silently
    let tracks4 = tracker.update(&[]);
    assert!(tracks4.is_empty());
    assert_eq!(tracker.tracks().len(), 1);
    assert_eq!(tracker.tracks()[0].state, TrackState::Lost);

    // Frame 5: Object reappears within the lost budget
    let tracks5 = tracker.update(&[det(115.0, 115.0, 0.9)]);
    assert_eq!(tracks5.len(), 1);
    assert_eq!(tracks5[0].track_id, id1);
}

#[test]
fn test_continuity_over_long_motion() {
    let mut tracker = MotionTracker::default();
    let mut ids = Vec::new();
    for frame in 0..120 {
        let out = tracker.update(&[det(4.0 * frame as f32, 50.0, 0.8)]);
        assert_eq!(out.len(), 1, "frame {frame}");
        ids.push(out[0].track_id);
    }
    assert!(ids.iter().all(|&id| id == ids[0]));
}

#[test]
fn test_ids_unique_and_increasing() {
    let mut tracker = MotionTracker::default();
    let out = tracker.update(&[
        det(0.0, 0.0, 0.9),
        det(300.0, 0.0, 0.8),
        det(0.0, 300.0, 0.7),
    ]);
    let ids: Vec<u64> = out.iter().map(|t| t.track_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    // A new object in a later frame gets the next id.
    let out = tracker.update(&[
        det(0.0, 0.0, 0.9),
        det(300.0, 0.0, 0.8),
        det(0.0, 300.0, 0.7),
        det(300.0, 300.0, 0.9),
    ]);
    let mut ids: Vec<u64> = out.iter().map(|t| t.track_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn test_death_and_rebirth() {
    let max_lost_frames = 3;
    let mut tracker = MotionTracker::new(TrackerConfig {
        max_lost_frames,
        ..TrackerConfig::default()
    });

    let first = tracker.update(&[det(200.0, 200.0, 0.9)])[0].track_id;
    for _ in 0..=max_lost_frames {
        assert!(tracker.update(&[]).is_empty());
    }
    assert!(tracker.tracks().is_empty());

    let reborn = tracker.update(&[det(200.0, 200.0, 0.9)]);
    assert_eq!(reborn.len(), 1);
    assert!(reborn[0].track_id > first);
}

#[test]
fn test_survives_exactly_max_lost_frames() {
    let max_lost_frames = 3;
    let mut tracker = MotionTracker::new(TrackerConfig {
        max_lost_frames,
        ..TrackerConfig::default()
    });

    let first = tracker.update(&[det(200.0, 200.0, 0.9)])[0].track_id;
    for _ in 0..max_lost_frames {
        tracker.update(&[]);
    }
    let back = tracker.update(&[det(200.0, 200.0, 0.9)]);
    assert_eq!(back[0].track_id, first);
}

#[test]
fn test_low_score_never_spawns() {
    let mut tracker = MotionTracker::default();
    for _ in 0..5 {
        assert!(tracker.update(&[det(10.0, 10.0, 0.3)]).is_empty());
    }
    assert!(tracker.tracks().is_empty());
}

#[test]
fn test_empty_input_is_valid() {
    let mut tracker = MotionTracker::default();
    assert!(tracker.update(&[]).is_empty());
    assert_eq!(tracker.frame_count(), 1);
}

#[test]
fn test_output_carries_latest_score_and_class() {
    let mut tracker = MotionTracker::default();
    tracker.update(&[Detection::new(0.0, 0.0, 80.0, 80.0, 0.9, 2)]);
    let out = tracker.update(&[Detection::new(2.0, 0.0, 80.0, 80.0, 0.6, 5)]);
    assert_eq!(out[0].detection.score, 0.6);
    assert_eq!(out[0].detection.class_id, 5);
    assert_eq!(out[0].bbox().x, 2.0);
}
