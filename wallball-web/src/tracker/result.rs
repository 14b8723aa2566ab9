//! Per-frame analysis output consumed by the transport layer

use serde::Serialize;

use crate::physics::JointAngles;
use crate::pose::Side;
use crate::squat::SquatState;

/// What the pipeline did with a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    /// Fewer than 33 landmarks
    NoPose,
    /// Lower body visibility below the gate
    LowConfidence,
    /// Passed the gate, debounce window still filling
    Settling,
    /// Neither side produced a knee angle
    NoAngle,
    Analyzed,
}

/// Cumulative session counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_squats: u32,
    pub valid_squats: u32,
    pub improper_squats: u32,
    pub total_throws: u32,
    pub valid_throws: u32,
    pub invalid_throws: u32,
    /// Valid squat followed by a valid throw
    pub combined_reps: u32,
}

/// One completed squat repetition
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepEvent {
    /// 1-based within the session
    pub rep_number: u32,
    pub valid: bool,
    /// Peak smoothed knee angle (degrees)
    pub max_depth: Option<f32>,
    /// Highest ball above the ankles since the previous rep (pixels)
    pub max_ball_height: Option<f32>,
    pub duration_secs: f64,
    pub timestamp_ms: f64,
    pub errors: Vec<String>,
    pub feedback: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub status: FrameStatus,
    /// State name (`s1`/`s2`/`s3`/`unknown`) or `no_pose`
    pub phase: String,
    /// Smoothed knee angle
    pub knee_angle: Option<f32>,
    pub side: Side,
    pub state_sequence: Vec<SquatState>,
    pub stats: Stats,
    pub feedback: Vec<String>,
    pub angles: JointAngles,
    pub inactive_secs: f64,
    pub ball_above_threshold: bool,
    pub rep_completed: bool,
    pub rep: Option<RepEvent>,
    pub combined_rep_completed: bool,
}

impl AnalysisResult {
    pub fn to_json(&self) -> String {
        // Plain data only, NaN becomes null
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}
