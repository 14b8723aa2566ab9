//! Versioned rule tables mapping a knee angle to a squat state
//!
//! Both the legacy threshold tracker and the multi-range tracker run on the
//! same state machine; only the classification table differs.

use serde::{Deserialize, Serialize};

use super::state::SquatState;

/// Inclusive angle range in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, angle: f32) -> bool {
        self.min <= angle && angle <= self.max
    }

    pub fn overlaps(&self, other: &AngleRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "version", rename_all = "snake_case")]
pub enum PhaseRules {
    /// Legacy tracker: standing below one threshold, deep at or above another,
    /// transition in between. No dead bands.
    Simple { standing_max: f32, deep_min: f32 },

    /// Three disjoint ranges with gaps between them; a knee angle inside a gap
    /// is `Unknown` and leaves the sequence untouched.
    MultiRange {
        standing: AngleRange,
        transition: AngleRange,
        deep: AngleRange,
    },
}

impl PhaseRules {
    /// Pro-mode ranges
    pub const fn pro() -> Self {
        PhaseRules::MultiRange {
            standing: AngleRange::new(0.0, 32.0),
            transition: AngleRange::new(35.0, 50.0),
            deep: AngleRange::new(52.0, 95.0),
        }
    }

    pub const fn legacy() -> Self {
        PhaseRules::Simple {
            standing_max: 30.0,
            deep_min: 90.0,
        }
    }

    pub fn classify(&self, knee_angle: f32) -> SquatState {
        if !knee_angle.is_finite() {
            return SquatState::Unknown;
        }

        match *self {
            PhaseRules::Simple { standing_max, deep_min } => {
                if knee_angle < 0.0 {
                    SquatState::Unknown
                } else if knee_angle < standing_max {
                    SquatState::Standing
                } else if knee_angle >= deep_min {
                    SquatState::Deep
                } else {
                    SquatState::Transition
                }
            }
            PhaseRules::MultiRange { standing, transition, deep } => {
                if standing.contains(knee_angle) {
                    SquatState::Standing
                } else if transition.contains(knee_angle) {
                    SquatState::Transition
                } else if deep.contains(knee_angle) {
                    SquatState::Deep
                } else {
                    SquatState::Unknown
                }
            }
        }
    }
}

impl Default for PhaseRules {
    fn default() -> Self {
        Self::pro()
    }
}
