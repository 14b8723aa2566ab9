//! End-to-end scenarios through `SessionTracker`
//!
//! Poses are synthesized side-on: ankle fixed, hip straight above it, knee
//! swung out so the angle at the ankle equals the requested knee angle.
//! Angles are held for several frames so the Kalman filter settles well
//! inside each state's range.

use crate::config::TrackerConfig;
use crate::physics::FEEDBACK_TOO_DEEP;
use crate::pose::{Landmark, ObjectPosition, Pose, Side, NOSE, POSE_LANDMARK_COUNT};
use crate::squat::{SquatState, ERROR_INSUFFICIENT_DEPTH, ERROR_TOO_DEEP};
use crate::tracker::{AnalysisResult, FrameStatus, SessionRegistry, SessionTracker};

const FRAME_MS: f64 = 1000.0 / 30.0;
const IMAGE_HEIGHT: f32 = 1000.0;

const STANDING: f32 = 10.0;
const HALF: f32 = 42.0;
const DEEP: f32 = 75.0;
const HOLD: usize = 12;

const ANKLE: (f32, f32) = (0.5, 0.95);
const SHIN: f32 = 0.1;
const HIP_Y: f32 = 0.75;
/// Hip below the knee at `DEEP`
const DROPPED_HIP_Y: f32 = 0.94;

// With the nose at 0.55 and ankles at 0.95 the athlete is 400px tall:
// head row 550, target line 950 - 1.5 * 400 = 350.
const BALL_LOW: f32 = 800.0;
const BALL_ABOVE_HEAD: f32 = 500.0;
const BALL_OVER_LINE: f32 = 300.0;
const BALL_PEAK: f32 = 250.0;

fn pose_at(knee_angle: f32, hip_y: f32, visibility: f32, timestamp_ms: f64) -> Pose {
    let rad = knee_angle.to_radians();
    let knee = (ANKLE.0 + SHIN * rad.sin(), ANKLE.1 - SHIN * rad.cos());

    let mut landmarks = vec![Landmark::default(); POSE_LANDMARK_COUNT];
    landmarks[NOSE] = Landmark::new(0.5, 0.55, 0.0, 1.0);
    for side in [Side::Left, Side::Right] {
        let ids = side.landmarks();
        landmarks[ids.shoulder] = Landmark::new(0.5, 0.62, 0.0, visibility);
        landmarks[ids.hip] = Landmark::new(ANKLE.0, hip_y, 0.0, visibility);
        landmarks[ids.knee] = Landmark::new(knee.0, knee.1, 0.0, visibility);
        landmarks[ids.ankle] = Landmark::new(ANKLE.0, ANKLE.1, 0.0, visibility);
        landmarks[ids.foot] = Landmark::new(0.55, 0.96, 0.0, visibility);
    }
    Pose::new(landmarks, timestamp_ms)
}

fn ball(y: f32) -> ObjectPosition {
    ObjectPosition::new(640.0, y, 40.0, 0.0)
}

/// Tracker plus a frame clock
struct Athlete {
    tracker: SessionTracker,
    frame: u32,
}

impl Athlete {
    fn new(config: TrackerConfig) -> Self {
        Self { tracker: SessionTracker::new(config), frame: 0 }
    }

    fn next_timestamp(&mut self) -> f64 {
        let ts = self.frame as f64 * FRAME_MS;
        self.frame += 1;
        ts
    }

    fn feed(&mut self, pose: Pose, ball_y: Option<f32>) -> AnalysisResult {
        let ball = ball_y.map(ball);
        self.tracker.update(&pose, IMAGE_HEIGHT, ball.as_ref())
    }

    fn hold(&mut self, knee_angle: f32, frames: usize) -> Vec<AnalysisResult> {
        self.hold_with_hip(knee_angle, HIP_Y, frames)
    }

    fn hold_with_hip(&mut self, knee_angle: f32, hip_y: f32, frames: usize) -> Vec<AnalysisResult> {
        (0..frames)
            .map(|_| {
                let ts = self.next_timestamp();
                self.feed(pose_at(knee_angle, hip_y, 1.0, ts), None)
            })
            .collect()
    }

    fn standing_with_ball(&mut self, ball_y: f32) -> AnalysisResult {
        let ts = self.next_timestamp();
        self.feed(pose_at(STANDING, HIP_Y, 1.0, ts), Some(ball_y))
    }

    /// stand, down, deep, up, stand
    fn full_squat(&mut self) -> Vec<AnalysisResult> {
        let mut results = self.hold(STANDING, HOLD);
        results.extend(self.hold(HALF, HOLD));
        results.extend(self.hold(DEEP, HOLD));
        results.extend(self.hold(HALF, HOLD));
        results.extend(self.hold(STANDING, HOLD));
        results
    }
}

fn completed(results: &[AnalysisResult]) -> Vec<&AnalysisResult> {
    results.iter().filter(|r| r.rep_completed).collect()
}

#[test]
fn test_valid_rep_end_to_end() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    let results = athlete.full_squat();

    let reps = completed(&results);
    assert_eq!(reps.len(), 1);
    let last = results.last().unwrap();
    assert_eq!(last.status, FrameStatus::Analyzed);
    assert_eq!(last.phase, "s1");
    assert_eq!(last.stats.total_squats, 1);
    assert_eq!(last.stats.valid_squats, 1);
    assert_eq!(last.stats.improper_squats, 0);
    assert!(last.state_sequence.is_empty());

    let rep = reps[0].rep.as_ref().unwrap();
    assert_eq!(rep.rep_number, 1);
    assert!(rep.valid);
    assert!(rep.errors.is_empty());
    let depth = rep.max_depth.unwrap();
    assert!(depth > 70.0 && depth < DEEP + 10.0, "depth {depth}");
    assert!(rep.duration_secs > 1.0);
    assert_eq!(rep.max_ball_height, None);

    // Both legs look identical; the tie goes to the right side
    assert_eq!(last.side, Side::Right);
    assert_eq!(athlete.tracker.reps().len(), 1);
}

#[test]
fn test_all_three_states_visited() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    let results = athlete.full_squat();

    let peak_sequence = results
        .iter()
        .map(|r| r.state_sequence.clone())
        .max_by_key(|s| s.len())
        .unwrap();
    assert_eq!(
        peak_sequence,
        vec![SquatState::Transition, SquatState::Deep, SquatState::Transition]
    );
    assert!(results.iter().any(|r| r.phase == "s3"));
}

#[test]
fn test_shallow_rep_is_improper() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    let mut results = athlete.hold(STANDING, HOLD);
    results.extend(athlete.hold(HALF, HOLD));
    results.extend(athlete.hold(STANDING, HOLD));

    let reps = completed(&results);
    assert_eq!(reps.len(), 1);
    let rep = reps[0].rep.as_ref().unwrap();
    assert!(!rep.valid);
    assert_eq!(rep.errors, vec![ERROR_INSUFFICIENT_DEPTH.to_string()]);

    let stats = results.last().unwrap().stats;
    assert_eq!(stats.valid_squats, 0);
    assert_eq!(stats.improper_squats, 1);
}

#[test]
fn test_hip_below_knee_is_too_deep() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    let mut results = athlete.hold(STANDING, HOLD);
    results.extend(athlete.hold(HALF, HOLD));
    let deep = athlete.hold_with_hip(DEEP, DROPPED_HIP_Y, HOLD);
    assert!(deep
        .iter()
        .all(|r| r.feedback.contains(&FEEDBACK_TOO_DEEP.to_string())));
    results.extend(deep);
    results.extend(athlete.hold(HALF, HOLD));
    results.extend(athlete.hold(STANDING, HOLD));

    let reps = completed(&results);
    assert_eq!(reps.len(), 1);
    let rep = reps[0].rep.as_ref().unwrap();
    assert!(!rep.valid);
    assert_eq!(rep.errors, vec![ERROR_TOO_DEEP.to_string()]);
    assert_eq!(results.last().unwrap().stats.improper_squats, 1);
    assert_eq!(results.last().unwrap().stats.valid_squats, 0);
}

#[test]
fn test_gate_and_debounce_leave_state_untouched() {
    let mut athlete = Athlete::new(TrackerConfig::default());

    let ts = athlete.next_timestamp();
    let result = athlete.feed(Pose::empty(ts), None);
    assert_eq!(result.status, FrameStatus::NoPose);
    assert_eq!(result.phase, "no_pose");
    assert_eq!(result.knee_angle, None);

    let ts = athlete.next_timestamp();
    let result = athlete.feed(pose_at(STANDING, HIP_Y, 0.1, ts), None);
    assert_eq!(result.status, FrameStatus::LowConfidence);

    let ts = athlete.next_timestamp();
    let result = athlete.feed(pose_at(STANDING, HIP_Y, 1.0, ts), None);
    assert_eq!(result.status, FrameStatus::Settling);
    assert_eq!(result.knee_angle, None);
    assert!(athlete.tracker.machine().current_state().is_none());

    let ts = athlete.next_timestamp();
    let result = athlete.feed(pose_at(STANDING, HIP_Y, 1.0, ts), None);
    assert_eq!(result.status, FrameStatus::Analyzed);
    assert_eq!(result.phase, "s1");
    let angle = result.knee_angle.unwrap();
    assert!((angle - STANDING).abs() < 0.5, "angle {angle}");
}

#[test]
fn test_occlusion_mid_rep_keeps_sequence() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    athlete.hold(STANDING, HOLD);
    let down = athlete.hold(HALF, HOLD);
    let before = down.last().unwrap().state_sequence.clone();
    assert_eq!(before, vec![SquatState::Transition]);

    let ts = athlete.next_timestamp();
    let result = athlete.feed(pose_at(HALF, HIP_Y, 0.0, ts), None);
    assert_eq!(result.status, FrameStatus::LowConfidence);
    assert_eq!(result.state_sequence, before);
    assert_eq!(result.stats.total_squats, 0);
}

#[test]
fn test_degenerate_knee_is_noop() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    athlete.hold(STANDING, HOLD);
    let before = athlete.hold(HALF, HOLD).pop().unwrap();
    let angle_before = athlete.tracker.last_angle();
    assert_eq!(before.state_sequence, vec![SquatState::Transition]);

    // Hip on top of the ankle: no knee angle on either side
    let result = athlete.hold_with_hip(HALF, ANKLE.1, 1).pop().unwrap();
    assert_eq!(result.status, FrameStatus::NoAngle);
    assert_eq!(result.phase, "s2");
    assert_eq!(result.knee_angle, None);
    assert_eq!(result.state_sequence, before.state_sequence);
    assert_eq!(result.stats, before.stats);
    assert_eq!(result.inactive_secs, before.inactive_secs);
    assert_eq!(athlete.tracker.last_angle(), angle_before);
}

#[test]
fn test_repeated_timestamps_stay_finite() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    for _ in 0..HOLD {
        let result = athlete.feed(pose_at(STANDING, HIP_Y, 1.0, 0.0), None);
        if let Some(angle) = result.knee_angle {
            assert!((angle - STANDING).abs() < 0.5, "angle {angle}");
        }
    }
    assert!(athlete.tracker.last_angle().is_some());
}

#[test]
fn test_throw_after_squat_is_compound_rep() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    athlete.full_squat();
    assert!(athlete.tracker.throw_detector().is_calibrated());

    assert!(!athlete.standing_with_ball(BALL_LOW).ball_above_threshold);
    assert!(!athlete.standing_with_ball(BALL_ABOVE_HEAD).combined_rep_completed);

    let result = athlete.standing_with_ball(BALL_OVER_LINE);
    assert!(result.ball_above_threshold);
    assert!(result.combined_rep_completed);
    assert_eq!(result.stats.combined_reps, 1);
    assert_eq!(result.stats.valid_throws, 1);

    // Still above the line: no second edge
    let result = athlete.standing_with_ball(BALL_PEAK);
    assert!(!result.combined_rep_completed);
    assert_eq!(result.stats.valid_throws, 1);

    // Back down, then a throw without a new squat
    athlete.standing_with_ball(BALL_LOW);
    let result = athlete.standing_with_ball(BALL_OVER_LINE);
    assert!(!result.combined_rep_completed);
    assert_eq!(result.stats.valid_throws, 2);
    assert_eq!(result.stats.total_throws, 2);
    assert_eq!(result.stats.combined_reps, 1);
}

#[test]
fn test_short_throw_counts_invalid() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    athlete.full_squat();

    athlete.standing_with_ball(BALL_LOW);
    athlete.standing_with_ball(BALL_ABOVE_HEAD);
    let result = athlete.standing_with_ball(BALL_LOW);

    assert!(!result.combined_rep_completed);
    assert_eq!(result.stats.invalid_throws, 1);
    assert_eq!(result.stats.valid_throws, 0);
    assert_eq!(result.stats.combined_reps, 0);
    // Squat latch is still waiting for a good throw
    athlete.standing_with_ball(BALL_ABOVE_HEAD);
    assert!(athlete.standing_with_ball(BALL_OVER_LINE).combined_rep_completed);
}

#[test]
fn test_ball_peak_lands_on_next_rep() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    athlete.full_squat();
    athlete.standing_with_ball(BALL_OVER_LINE);
    athlete.standing_with_ball(BALL_PEAK);
    athlete.standing_with_ball(BALL_LOW);

    let results = athlete.full_squat();
    let reps = completed(&results);
    assert_eq!(reps.len(), 1);
    let rep = reps[0].rep.as_ref().unwrap();
    assert_eq!(rep.rep_number, 2);
    // Ankle row 950, ball peak row 250
    let height = rep.max_ball_height.unwrap();
    assert!((height - 700.0).abs() < 0.5, "height {height}");
}

#[test]
fn test_inactivity_resets_squats_but_not_compound_reps() {
    let mut config = TrackerConfig::default();
    config.set_inactivity_secs(3.0);
    let mut athlete = Athlete::new(config);

    athlete.full_squat();
    athlete.standing_with_ball(BALL_OVER_LINE);
    assert_eq!(athlete.tracker.stats().combined_reps, 1);
    assert_eq!(athlete.tracker.stats().valid_squats, 1);

    // Stuck at the bottom for ~3.5s
    let results = athlete.hold(DEEP, 105);
    let last = results.last().unwrap();
    assert!(last.inactive_secs >= 3.0);
    assert_eq!(last.stats.valid_squats, 0);
    assert_eq!(last.stats.total_squats, 0);
    assert!(last.state_sequence.is_empty());
    assert_eq!(last.stats.combined_reps, 1);
}

#[test]
fn test_reset_starts_over() {
    let mut athlete = Athlete::new(TrackerConfig::default());
    athlete.full_squat();
    athlete.tracker.reset();

    assert_eq!(athlete.tracker.stats().total_squats, 0);
    assert!(athlete.tracker.reps().is_empty());
    assert!(!athlete.tracker.throw_detector().is_calibrated());
    assert!(athlete.tracker.time_span().is_none());
}

#[test]
fn test_registry_summary() {
    let mut registry = SessionRegistry::default();
    registry.create("athlete-1");

    let mut athlete = Athlete::new(TrackerConfig::default());
    let mut frames = Vec::new();
    for &(angle, count) in &[(STANDING, HOLD), (HALF, HOLD), (STANDING, HOLD)] {
        for _ in 0..count {
            let ts = athlete.next_timestamp();
            frames.push(pose_at(angle, HIP_Y, 1.0, ts));
        }
    }
    for pose in &frames {
        registry.update("athlete-1", pose, IMAGE_HEIGHT, None).unwrap();
    }

    let summary = registry.end("athlete-1").unwrap();
    assert_eq!(summary.total_reps, 1);
    assert_eq!(summary.valid_reps, 0);
    assert_eq!(summary.invalid_reps, 1);
    assert_eq!(summary.start_ms, Some(0.0));
    assert_eq!(summary.end_ms, frames.last().map(|p| p.timestamp_ms));
    assert!(registry.is_empty());

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"sessionId\":\"athlete-1\""));
    assert!(json.contains("\"improperSquats\":1"));
}
