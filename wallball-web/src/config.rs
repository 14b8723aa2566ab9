//! Tracker configuration
//!
//! One bundle of every threshold the pipeline uses. `Default` is the pro
//! preset; partial JSON falls back to defaults field by field.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WallBallError};
use crate::pose::NOSE;
use crate::squat::{AngleRange, PhaseRules};

/// Knee-vertical thresholds used by the form validator (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormThresholds {
    /// "Lower your hips" band, exclusive on both ends
    pub shallow: AngleRange,
    /// Above this the squat is too deep
    pub max_depth: f32,
    /// Torso lean band; outside it at squat depth gives a hint
    pub hip: AngleRange,
    /// Shin angle above this at squat depth gives a hint
    pub ankle_max: f32,
}

impl Default for FormThresholds {
    fn default() -> Self {
        Self {
            shallow: AngleRange::new(50.0, 65.0),
            max_depth: 95.0,
            hip: AngleRange::new(15.0, 50.0),
            ankle_max: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum mean visibility over hips, knees and ankles
    pub min_visibility: f32,
    /// Visibility at which a single landmark counts as present
    pub presence_visibility: f32,
    /// Present landmarks (out of six) that rescue a low-visibility frame
    pub min_present: usize,
    /// Consecutive qualifying frames before the state machine sees input
    pub debounce_frames: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_visibility: 0.5,
            presence_visibility: 0.5,
            min_present: 4,
            debounce_frames: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub process_noise: f32,
    pub measurement_noise: f32,
    pub initial_covariance: f32,
    /// Used when consecutive timestamps do not advance (seconds)
    pub default_dt: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            process_noise: 0.1,
            measurement_noise: 2.0,
            initial_covariance: 1000.0,
            default_dt: 1.0 / 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowConfig {
    /// Threshold line height as a multiple of the standing height
    pub threshold_multiple: f32,
    /// Landmark used as the top of the athlete
    pub head_landmark: usize,
}

impl Default for ThrowConfig {
    fn default() -> Self {
        Self {
            threshold_multiple: 1.5,
            head_landmark: NOSE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub rules: PhaseRules,
    pub form: FormThresholds,
    pub gate: GateConfig,
    pub smoothing: SmoothingConfig,
    pub throw: ThrowConfig,
    /// Visibility lead one side needs before it is preferred
    pub side_margin: f32,
    /// Time away from standing before counters reset (seconds)
    pub inactivity_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            rules: PhaseRules::pro(),
            form: FormThresholds::default(),
            gate: GateConfig::default(),
            smoothing: SmoothingConfig::default(),
            throw: ThrowConfig::default(),
            side_margin: 0.1,
            inactivity_secs: 15.0,
        }
    }
}

impl TrackerConfig {
    /// Legacy single-threshold preset
    pub fn legacy() -> Self {
        Self {
            rules: PhaseRules::legacy(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn set_rules(&mut self, rules: PhaseRules) {
        self.rules = rules;
    }

    pub fn set_inactivity_secs(&mut self, secs: f64) {
        self.inactivity_secs = secs;
    }

    pub fn set_debounce_frames(&mut self, frames: u32) {
        self.gate.debounce_frames = frames;
    }

    pub fn inactivity_ms(&self) -> f64 {
        self.inactivity_secs * 1000.0
    }

    pub fn validate(&self) -> Result<()> {
        match self.rules {
            PhaseRules::Simple { standing_max, deep_min } => {
                check_finite("rules.standing_max", standing_max)?;
                check_finite("rules.deep_min", deep_min)?;
                if standing_max >= deep_min {
                    return Err(WallBallError::invalid(
                        "rules",
                        "standing_max must be below deep_min",
                    ));
                }
            }
            PhaseRules::MultiRange { standing, transition, deep } => {
                check_range("rules.standing", &standing)?;
                check_range("rules.transition", &transition)?;
                check_range("rules.deep", &deep)?;
                if standing.overlaps(&transition)
                    || transition.overlaps(&deep)
                    || standing.overlaps(&deep)
                {
                    return Err(WallBallError::invalid("rules", "angle ranges overlap"));
                }
            }
        }

        check_range("form.shallow", &self.form.shallow)?;
        check_range("form.hip", &self.form.hip)?;
        check_finite("form.max_depth", self.form.max_depth)?;
        check_finite("form.ankle_max", self.form.ankle_max)?;

        check_unit("gate.min_visibility", self.gate.min_visibility)?;
        check_unit("gate.presence_visibility", self.gate.presence_visibility)?;
        if self.gate.min_present > 6 {
            return Err(WallBallError::invalid("gate.min_present", "at most 6 landmarks"));
        }
        if self.gate.debounce_frames == 0 {
            return Err(WallBallError::invalid("gate.debounce_frames", "must be at least 1"));
        }

        check_positive("smoothing.process_noise", self.smoothing.process_noise)?;
        check_positive("smoothing.measurement_noise", self.smoothing.measurement_noise)?;
        check_positive("smoothing.initial_covariance", self.smoothing.initial_covariance)?;
        check_positive("smoothing.default_dt", self.smoothing.default_dt)?;

        check_positive("throw.threshold_multiple", self.throw.threshold_multiple)?;
        if self.throw.head_landmark >= crate::pose::POSE_LANDMARK_COUNT {
            return Err(WallBallError::invalid("throw.head_landmark", "not a pose landmark"));
        }

        check_unit("side_margin", self.side_margin)?;
        if !(self.inactivity_secs.is_finite() && self.inactivity_secs > 0.0) {
            return Err(WallBallError::invalid("inactivity_secs", "must be positive"));
        }
        Ok(())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(WallBallError::invalid(field, format!("{value} is not finite")))
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<()> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(WallBallError::invalid(field, format!("{value} must be positive")))
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<()> {
    check_finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WallBallError::invalid(field, format!("{value} outside 0-1")))
    }
}

fn check_range(field: &'static str, range: &AngleRange) -> Result<()> {
    check_finite(field, range.min)?;
    check_finite(field, range.max)?;
    if range.min <= range.max {
        Ok(())
    } else {
        Err(WallBallError::invalid(field, "min above max"))
    }
}
