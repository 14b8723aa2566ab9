//! Squat form validation from vertical-referenced joint angles

use serde::Serialize;

use crate::config::FormThresholds;
use crate::pose::{Pose, Side};
use crate::squat::{SquatState, StateSequence};

use super::angles::vertical_angle;

pub const FEEDBACK_LOWER_HIPS: &str = "LOWER YOUR HIPS";
pub const FEEDBACK_TOO_DEEP: &str = "SQUAT TOO DEEP";
pub const FEEDBACK_NO_LANDMARKS: &str = "Insufficient landmarks detected";
pub const FEEDBACK_LEAN_FORWARD: &str = "LEAN FORWARD SLIGHTLY";
pub const FEEDBACK_CHEST_UP: &str = "KEEP YOUR CHEST UP";
pub const FEEDBACK_KNEES_OVER_TOES: &str = "KNEES PAST TOES";

/// Frame-bottom row in normalized coordinates
const FRAME_BOTTOM: f32 = 1.0;

/// Segment angles from vertical, in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct JointAngles {
    /// Torso lean (shoulder→hip)
    pub hip: Option<f32>,
    /// Thigh (hip→knee)
    pub knee: Option<f32>,
    /// Shin (knee→ankle)
    pub ankle: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReport {
    pub valid: bool,
    pub feedback: Vec<String>,
    pub angles: JointAngles,
    /// Set when this frame should mark the current cycle as improper
    #[serde(skip)]
    pub incorrect_posture: bool,
}

impl FormReport {
    fn insufficient() -> Self {
        Self {
            valid: false,
            feedback: vec![FEEDBACK_NO_LANDMARKS.to_string()],
            angles: JointAngles::default(),
            incorrect_posture: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FormValidator {
    thresholds: FormThresholds,
}

impl FormValidator {
    pub fn new(thresholds: FormThresholds) -> Self {
        Self { thresholds }
    }

    /// Validate the selected side against the sequence recorded so far
    pub fn validate(&self, pose: &Pose, side: Side, sequence: &StateSequence) -> FormReport {
        if !pose.is_complete() {
            return FormReport::insufficient();
        }

        let ids = side.landmarks();
        let (Some(shoulder), Some(hip), Some(knee), Some(ankle)) = (
            pose.get(ids.shoulder),
            pose.get(ids.hip),
            pose.get(ids.knee),
            pose.get(ids.ankle),
        ) else {
            return FormReport::insufficient();
        };

        let angles = JointAngles {
            hip: vertical_angle(shoulder, hip, FRAME_BOTTOM),
            knee: vertical_angle(hip, knee, FRAME_BOTTOM),
            ankle: vertical_angle(knee, ankle, FRAME_BOTTOM),
        };

        let mut report = FormReport {
            valid: true,
            feedback: Vec::new(),
            angles,
            incorrect_posture: false,
        };

        let Some(knee_vertical) = angles.knee else {
            return report;
        };

        let shallow = self.thresholds.shallow;
        if shallow.min < knee_vertical
            && knee_vertical < shallow.max
            && sequence.count(SquatState::Transition) == 1
        {
            report.feedback.push(FEEDBACK_LOWER_HIPS.to_string());
        }

        if knee_vertical > self.thresholds.max_depth {
            report.feedback.push(FEEDBACK_TOO_DEEP.to_string());
            report.valid = false;
            report.incorrect_posture = true;
        }

        // Alignment hints only once the thigh reaches squat depth
        if knee_vertical >= shallow.min {
            self.check_alignment(&mut report);
        }

        report
    }

    /// Torso lean and shin angle. Informational, never invalidates.
    fn check_alignment(&self, report: &mut FormReport) {
        let hip = self.thresholds.hip;
        match report.angles.hip {
            Some(lean) if lean < hip.min => {
                report.feedback.push(FEEDBACK_LEAN_FORWARD.to_string())
            }
            Some(lean) if lean > hip.max => report.feedback.push(FEEDBACK_CHEST_UP.to_string()),
            _ => {}
        }

        if matches!(report.angles.ankle, Some(shin) if shin > self.thresholds.ankle_max) {
            report.feedback.push(FEEDBACK_KNEES_OVER_TOES.to_string());
        }
    }
}
