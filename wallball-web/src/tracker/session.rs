//! Per-session orchestrator
//!
//! Owns every piece of per-session state. One frame is processed completely
//! before the next; frames must arrive in capture order.
//!
//! Pipeline per frame:
//! gate → side selection → knee angle → Kalman → state machine →
//! form check → rep evaluation → throw detection → fusion

use crate::config::TrackerConfig;
use crate::physics::{
    select_side, ConfidenceGate, FormReport, FormValidator, GateDecision, KalmanFilter,
    ThrowDetector, ThrowEvent,
};
use crate::pose::{ObjectPosition, Pose};
use crate::squat::{CycleSummary, PhaseStateMachine, RepOutcome, SquatState};

use super::fusion::CompoundCounter;
use super::result::{AnalysisResult, FrameStatus, RepEvent, Stats};

const NO_POSE: &str = "no_pose";

pub struct SessionTracker {
    config: TrackerConfig,

    // Processing stages
    gate: ConfidenceGate,
    smoother: KalmanFilter,
    machine: PhaseStateMachine,
    validator: FormValidator,
    throws: ThrowDetector,
    compound: CompoundCounter,

    // Frame bookkeeping, updated only after a fully processed frame
    last_timestamp_ms: Option<f64>,
    last_angle: Option<f32>,
    last_feedback: Vec<String>,

    // Session history
    first_timestamp_ms: Option<f64>,
    latest_timestamp_ms: Option<f64>,
    reps: Vec<RepEvent>,
}

impl SessionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            gate: ConfidenceGate::new(config.gate),
            smoother: KalmanFilter::from_config(&config.smoothing),
            machine: PhaseStateMachine::from_config(&config),
            validator: FormValidator::new(config.form),
            throws: ThrowDetector::new(config.throw),
            compound: CompoundCounter::new(),
            last_timestamp_ms: None,
            last_angle: None,
            last_feedback: Vec::new(),
            first_timestamp_ms: None,
            latest_timestamp_ms: None,
            reps: Vec::new(),
            config,
        }
    }

    /// Process one frame.
    ///
    /// `image_height` is in pixels and only matters for throw calibration;
    /// `ball` is the resolved circle-detector output, if any ran this frame.
    pub fn update(
        &mut self,
        pose: &Pose,
        image_height: f32,
        ball: Option<&ObjectPosition>,
    ) -> AnalysisResult {
        self.first_timestamp_ms.get_or_insert(pose.timestamp_ms);
        self.latest_timestamp_ms = Some(pose.timestamp_ms);

        // Stage 1: confidence gate + debounce
        match self.gate.apply(pose) {
            GateDecision::Rejected if !pose.is_complete() => {
                return self.idle_result(FrameStatus::NoPose)
            }
            GateDecision::Rejected => return self.idle_result(FrameStatus::LowConfidence),
            GateDecision::Settling => return self.idle_result(FrameStatus::Settling),
            GateDecision::Accepted => {}
        }

        // Stage 2: side selection and knee angle with fallback
        let preferred = select_side(pose, self.config.side_margin);
        let Some((side, raw_angle)) = self.machine.measure_knee_angle(pose, preferred) else {
            return self.idle_result(FrameStatus::NoAngle);
        };

        // Stage 3: smoothing
        let dt = self.frame_dt(pose.timestamp_ms);
        let knee_angle = self.smoother.filter(raw_angle, dt);

        // Stage 4: state machine, form check, rep evaluation
        let timestamp_ms = pose.timestamp_ms;
        self.machine.set_side(side);
        let state = self.machine.record(knee_angle, timestamp_ms);

        let form = self.validator.validate(pose, side, self.machine.sequence());
        if form.incorrect_posture {
            self.machine.flag_incorrect_posture();
        }
        let cycle = self.machine.settle(timestamp_ms);

        // Stage 5: throw calibration and detection
        if state == SquatState::Standing && self.throws.calibrate(pose, image_height) {
            log::info!("throw detector calibrated at {:.0}ms", timestamp_ms);
        }

        if matches!(&cycle, Some(c) if c.outcome == RepOutcome::Valid) {
            self.compound.on_squat();
        }

        let mut ball_above_threshold = self.throws.is_above_threshold();
        let mut combined_rep_completed = false;
        if let Some(ball) = ball {
            let throw = self.throws.update(ball);
            ball_above_threshold = throw.above_threshold;
            if throw.event == Some(ThrowEvent::Valid) {
                combined_rep_completed = self.compound.on_throw();
                if combined_rep_completed {
                    log::debug!("compound rep {}", self.compound.combined());
                }
            }
        }

        // Stage 6: rep event and bookkeeping
        let rep = cycle.map(|c| self.push_rep(c, &form, timestamp_ms));

        self.last_timestamp_ms = Some(timestamp_ms);
        self.last_angle = Some(knee_angle);
        self.last_feedback = form.feedback.clone();

        AnalysisResult {
            status: FrameStatus::Analyzed,
            phase: state.name().to_string(),
            knee_angle: Some(knee_angle),
            side,
            state_sequence: self.machine.sequence().as_slice().to_vec(),
            stats: self.stats(),
            feedback: form.feedback,
            angles: form.angles,
            inactive_secs: self.machine.inactive_secs(),
            ball_above_threshold,
            rep_completed: rep.is_some(),
            rep,
            combined_rep_completed,
        }
    }

    /// Seconds since the last processed frame, or the configured default
    fn frame_dt(&self, timestamp_ms: f64) -> f32 {
        match self.last_timestamp_ms {
            Some(last) if timestamp_ms > last => ((timestamp_ms - last) / 1000.0) as f32,
            _ => self.config.smoothing.default_dt,
        }
    }

    fn push_rep(&mut self, cycle: CycleSummary, form: &FormReport, timestamp_ms: f64) -> RepEvent {
        let rep = RepEvent {
            rep_number: self.reps.len() as u32 + 1,
            valid: cycle.outcome == RepOutcome::Valid,
            max_depth: cycle.peak_angle,
            max_ball_height: self.throws.take_peak_height(),
            duration_secs: cycle.duration_ms / 1000.0,
            timestamp_ms,
            errors: cycle.errors,
            feedback: form.feedback.clone(),
        };
        self.reps.push(rep.clone());
        rep
    }

    /// Result for a frame that did not reach the state machine
    fn idle_result(&self, status: FrameStatus) -> AnalysisResult {
        let phase = self
            .machine
            .current_state()
            .map_or(NO_POSE, |s| s.name())
            .to_string();

        AnalysisResult {
            status,
            phase,
            knee_angle: None,
            side: self.machine.side(),
            state_sequence: self.machine.sequence().as_slice().to_vec(),
            stats: self.stats(),
            feedback: Vec::new(),
            angles: Default::default(),
            inactive_secs: self.machine.inactive_secs(),
            ball_above_threshold: self.throws.is_above_threshold(),
            rep_completed: false,
            rep: None,
            combined_rep_completed: false,
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_squats: self.machine.total_reps(),
            valid_squats: self.machine.valid_reps(),
            improper_squats: self.machine.improper_reps(),
            total_throws: self.throws.total_throws(),
            valid_throws: self.throws.valid_throws(),
            invalid_throws: self.throws.invalid_throws(),
            combined_reps: self.compound.combined(),
        }
    }

    pub fn reps(&self) -> &[RepEvent] {
        &self.reps
    }

    pub fn machine(&self) -> &PhaseStateMachine {
        &self.machine
    }

    pub fn throw_detector(&self) -> &ThrowDetector {
        &self.throws
    }

    /// Last smoothed knee angle
    pub fn last_angle(&self) -> Option<f32> {
        self.last_angle
    }

    pub fn last_feedback(&self) -> &[String] {
        &self.last_feedback
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Timestamps of the first and latest frame seen
    pub fn time_span(&self) -> Option<(f64, f64)> {
        Some((self.first_timestamp_ms?, self.latest_timestamp_ms?))
    }

    /// Fresh session with the same config
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
