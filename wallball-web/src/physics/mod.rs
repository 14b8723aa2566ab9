//! Physics module - signal smoothing, joint geometry and detectors
//!
//! Re-exports only. All logic in submodules.

mod kalman;
mod angles;
mod side_selector;
mod confidence_gate;
mod form;
mod throw_detection;

pub use kalman::KalmanFilter;
pub use angles::{joint_angle, angle_about_reference, angle_about_origin, vertical_angle};
pub use side_selector::{select_side, SIDE_MARGIN};
pub use confidence_gate::{ConfidenceGate, GateDecision};
pub use form::{
    FormValidator, FormReport, JointAngles,
    FEEDBACK_LOWER_HIPS, FEEDBACK_TOO_DEEP, FEEDBACK_NO_LANDMARKS,
    FEEDBACK_LEAN_FORWARD, FEEDBACK_CHEST_UP, FEEDBACK_KNEES_OVER_TOES,
};
pub use throw_detection::{ThrowDetector, ThrowCalibration, ThrowEvent, ThrowUpdate};
