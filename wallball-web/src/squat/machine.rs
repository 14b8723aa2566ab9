//! Phase state machine: knee angle in, squat states and rep counts out
//!
//! Per frame the caller runs, in order:
//! 1. `measure_knee_angle` (with side fallback), then smoothing, `set_side`
//! 2. `record` the smoothed angle
//! 3. form validation, `flag_incorrect_posture` if needed
//! 4. `settle` - rep evaluation on standing, inactivity timer otherwise
//!
//! `advance` runs 2 and 4 back to back when no form check is wanted.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::physics::angle_about_reference;
use crate::pose::{Pose, Side};

use super::rules::PhaseRules;
use super::state::{SquatState, StateSequence};

pub const ERROR_INSUFFICIENT_DEPTH: &str = "INSUFFICIENT_DEPTH";
pub const ERROR_TOO_DEEP: &str = "SQUAT_TOO_DEEP";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepOutcome {
    Valid,
    Improper,
}

/// A finished down-up cycle
#[derive(Clone, Debug, PartialEq)]
pub struct CycleSummary {
    pub outcome: RepOutcome,
    /// Largest knee angle seen during the cycle
    pub peak_angle: Option<f32>,
    pub duration_ms: f64,
    pub errors: Vec<String>,
}

pub struct PhaseStateMachine {
    rules: PhaseRules,
    inactivity_ms: f64,

    // State tracking
    current: Option<SquatState>,
    previous: Option<SquatState>,
    sequence: StateSequence,
    side: Side,

    // Counters
    valid_reps: u32,
    improper_reps: u32,

    // Form
    incorrect_posture: bool,

    // Timing (frame timestamps, ms)
    inactive_since_ms: Option<f64>,
    inactive_ms: f64,
    cycle_start_ms: Option<f64>,
    peak_angle: Option<f32>,
}

impl PhaseStateMachine {
    pub fn new(rules: PhaseRules, inactivity_ms: f64) -> Self {
        Self {
            rules,
            inactivity_ms,
            current: None,
            previous: None,
            sequence: StateSequence::new(),
            side: Side::Left,
            valid_reps: 0,
            improper_reps: 0,
            incorrect_posture: false,
            inactive_since_ms: None,
            inactive_ms: 0.0,
            cycle_start_ms: None,
            peak_angle: None,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.rules, config.inactivity_ms())
    }

    /// Knee angle on `preferred`, retrying the other side.
    ///
    /// Measured at the ankle between the ankle→hip and ankle→knee rays: ~0
    /// standing, growing with depth. Returns the side that produced the
    /// angle; the caller commits it with `set_side` once the frame is
    /// processed. `None` means a no-op frame.
    pub fn measure_knee_angle(&self, pose: &Pose, preferred: Side) -> Option<(Side, f32)> {
        if !pose.is_complete() {
            return None;
        }

        if let Some(angle) = knee_angle(pose, preferred) {
            return Some((preferred, angle));
        }

        let other = preferred.opposite();
        let angle = knee_angle(pose, other)?;
        log::debug!("knee angle unavailable on {} side, using {}", preferred.name(), other.name());
        Some((other, angle))
    }

    /// Classify the smoothed angle and apply the sequence append rules
    pub fn record(&mut self, knee_angle: f32, timestamp_ms: f64) -> SquatState {
        let state = self.rules.classify(knee_angle);
        self.previous = self.current;
        self.current = Some(state);

        self.sequence.record(state);

        if state != SquatState::Standing {
            self.cycle_start_ms.get_or_insert(timestamp_ms);
            self.peak_angle = Some(self.peak_angle.map_or(knee_angle, |p| p.max(knee_angle)));
        }

        state
    }

    /// Mark the current cycle as improper (too deep)
    pub fn flag_incorrect_posture(&mut self) {
        self.incorrect_posture = true;
    }

    /// Rep evaluation on standing, inactivity bookkeeping otherwise
    pub fn settle(&mut self, timestamp_ms: f64) -> Option<CycleSummary> {
        if self.current == Some(SquatState::Standing) {
            let summary = self.evaluate_rep(timestamp_ms);

            self.sequence.clear();
            self.incorrect_posture = false;
            self.cycle_start_ms = None;
            self.peak_angle = None;

            self.inactive_since_ms = Some(timestamp_ms);
            self.inactive_ms = 0.0;
            return summary;
        }

        let since = *self.inactive_since_ms.get_or_insert(timestamp_ms);
        self.inactive_ms = (timestamp_ms - since).max(0.0);

        if self.inactive_ms >= self.inactivity_ms {
            if self.valid_reps > 0 || self.improper_reps > 0 || !self.sequence.is_empty() {
                log::info!(
                    "inactive for {:.1}s, resetting {} valid / {} improper reps",
                    self.inactive_ms / 1000.0,
                    self.valid_reps,
                    self.improper_reps
                );
            }
            self.valid_reps = 0;
            self.improper_reps = 0;
            self.sequence.clear();
            self.cycle_start_ms = None;
            self.peak_angle = None;
        }

        None
    }

    /// `record` + `settle` without a form check
    pub fn advance(&mut self, knee_angle: f32, timestamp_ms: f64) -> Option<CycleSummary> {
        self.record(knee_angle, timestamp_ms);
        self.settle(timestamp_ms)
    }

    fn evaluate_rep(&mut self, timestamp_ms: f64) -> Option<CycleSummary> {
        let outcome = if self.sequence.is_full_cycle() && !self.incorrect_posture {
            self.valid_reps += 1;
            RepOutcome::Valid
        } else if self.sequence.is_shallow() || self.incorrect_posture {
            self.improper_reps += 1;
            RepOutcome::Improper
        } else {
            return None;
        };

        let mut errors = Vec::new();
        if self.sequence.is_shallow() {
            errors.push(ERROR_INSUFFICIENT_DEPTH.to_string());
        }
        if self.incorrect_posture {
            errors.push(ERROR_TOO_DEEP.to_string());
        }

        let duration_ms = self
            .cycle_start_ms
            .map_or(0.0, |start| (timestamp_ms - start).max(0.0));

        log::debug!(
            "rep complete: {:?}, valid {} improper {}",
            outcome,
            self.valid_reps,
            self.improper_reps
        );

        Some(CycleSummary {
            outcome,
            peak_angle: self.peak_angle,
            duration_ms,
            errors,
        })
    }

    pub fn current_state(&self) -> Option<SquatState> {
        self.current
    }

    pub fn previous_state(&self) -> Option<SquatState> {
        self.previous
    }

    pub fn sequence(&self) -> &StateSequence {
        &self.sequence
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Commit the side that produced this frame's knee angle
    pub fn set_side(&mut self, side: Side) {
        self.side = side;
    }

    pub fn valid_reps(&self) -> u32 {
        self.valid_reps
    }

    pub fn improper_reps(&self) -> u32 {
        self.improper_reps
    }

    pub fn total_reps(&self) -> u32 {
        self.valid_reps + self.improper_reps
    }

    pub fn incorrect_posture(&self) -> bool {
        self.incorrect_posture
    }

    pub fn inactive_secs(&self) -> f64 {
        self.inactive_ms / 1000.0
    }

    pub fn rules(&self) -> &PhaseRules {
        &self.rules
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.rules, self.inactivity_ms);
    }
}

impl Default for PhaseStateMachine {
    fn default() -> Self {
        Self::from_config(&TrackerConfig::default())
    }
}

fn knee_angle(pose: &Pose, side: Side) -> Option<f32> {
    let ids = side.landmarks();
    let hip = pose.get(ids.hip)?;
    let knee = pose.get(ids.knee)?;
    let ankle = pose.get(ids.ankle)?;
    angle_about_reference(hip, knee, ankle)
}
