//! Confidence Gate - first stage of the per-frame pipeline
//!
//! Frames whose lower body is poorly detected never reach the state machine.
//! A short debounce suppresses single good frames between bad ones.

use crate::config::GateConfig;
use crate::pose::{Pose, LOWER_BODY};

/// Gate decision for one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Frame failed the visibility check
    Rejected,
    /// Frame passed but the debounce window is not full yet
    Settling,
    /// Frame may drive the state machine
    Accepted,
}

/// Visibility gate with a consecutive-frame debounce
#[derive(Clone, Debug)]
pub struct ConfidenceGate {
    config: GateConfig,
    /// Consecutive qualifying frames seen so far
    streak: u32,
}

impl ConfidenceGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config, streak: 0 }
    }

    /// Stateless visibility check.
    ///
    /// A frame fails only when the mean visibility is low AND fewer than
    /// `min_present` of the six hip/knee/ankle landmarks are present.
    pub fn qualifies(&self, pose: &Pose) -> bool {
        if !pose.is_complete() {
            return false;
        }

        let mean = pose.mean_visibility(&LOWER_BODY).unwrap_or(0.0);
        let present = LOWER_BODY
            .iter()
            .filter_map(|&i| pose.get(i))
            .filter(|lm| lm.visibility >= self.config.presence_visibility)
            .count();

        !(mean < self.config.min_visibility && present < self.config.min_present)
    }

    /// Apply the gate to the next frame
    pub fn apply(&mut self, pose: &Pose) -> GateDecision {
        if !self.qualifies(pose) {
            self.streak = 0;
            return GateDecision::Rejected;
        }

        self.streak = self.streak.saturating_add(1);
        if self.streak >= self.config.debounce_frames {
            GateDecision::Accepted
        } else {
            GateDecision::Settling
        }
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}
