//! Ball throw detection against a calibrated height line
//!
//! Calibrates once from a standing pose: the athlete's pixel height sets a
//! target line at a fixed multiple of that height above the ankles. A throw
//! counts on the frame the ball first rises above the line.

use crate::config::ThrowConfig;
use crate::pose::{ObjectPosition, Pose, LEFT_ANKLE, RIGHT_ANKLE};

/// Rows in image pixels, y grows downward
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowCalibration {
    /// Head-to-ankle distance of the standing athlete
    pub standing_height_px: f32,
    pub ankle_row_px: f32,
    pub head_row_px: f32,
    /// Ball must rise above (be smaller than) this row
    pub threshold_row_px: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrowEvent {
    /// Ball crossed the target line
    Valid,
    /// Ball went above head height and came back down short of the line
    Invalid,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThrowUpdate {
    pub above_threshold: bool,
    pub event: Option<ThrowEvent>,
}

/// Edge-triggered throw detector
#[derive(Clone, Debug)]
pub struct ThrowDetector {
    config: ThrowConfig,
    calibration: Option<ThrowCalibration>,
    /// Last-known "above threshold" flag
    above_threshold: bool,
    above_head: bool,
    /// Ball went above head height and has not been scored yet
    attempt_open: bool,
    valid_throws: u32,
    invalid_throws: u32,
    /// Highest ball (px above ankles) since last taken
    peak_height_px: Option<f32>,
}

impl ThrowDetector {
    pub fn new(config: ThrowConfig) -> Self {
        Self {
            config,
            calibration: None,
            above_threshold: false,
            above_head: false,
            attempt_open: false,
            valid_throws: 0,
            invalid_throws: 0,
            peak_height_px: None,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    pub fn calibration(&self) -> Option<&ThrowCalibration> {
        self.calibration.as_ref()
    }

    /// Calibrate from a standing pose. Only the first successful call counts.
    ///
    /// Returns true if this call performed the calibration.
    pub fn calibrate(&mut self, pose: &Pose, image_height: f32) -> bool {
        if self.calibration.is_some() || !pose.is_complete() {
            return false;
        }
        if !(image_height.is_finite() && image_height > 0.0) {
            return false;
        }

        let Some(head_y) = pose
            .get(self.config.head_landmark)
            .and_then(|lm| lm.xy())
            .map(|(_, y)| y)
        else {
            return false;
        };

        // Lowest visible ankle is closest to the floor
        let ankle_y = [LEFT_ANKLE, RIGHT_ANKLE]
            .iter()
            .filter_map(|&i| pose.get(i).and_then(|lm| lm.xy()))
            .map(|(_, y)| y)
            .fold(None, |acc: Option<f32>, y| Some(acc.map_or(y, |a| a.max(y))));
        let Some(ankle_y) = ankle_y else {
            return false;
        };

        let standing_height_px = (ankle_y - head_y) * image_height;
        if standing_height_px <= 0.0 {
            return false;
        }

        let ankle_row_px = ankle_y * image_height;
        let calibration = ThrowCalibration {
            standing_height_px,
            ankle_row_px,
            head_row_px: ankle_row_px - standing_height_px,
            threshold_row_px: ankle_row_px - self.config.threshold_multiple * standing_height_px,
        };
        log::info!(
            "throw line calibrated: height {:.0}px, threshold row {:.0}px",
            calibration.standing_height_px,
            calibration.threshold_row_px
        );
        self.calibration = Some(calibration);
        true
    }

    /// Feed one ball position. Uncalibrated detectors ignore the ball.
    pub fn update(&mut self, ball: &ObjectPosition) -> ThrowUpdate {
        let Some(cal) = self.calibration else {
            return ThrowUpdate::default();
        };
        if !ball.y.is_finite() {
            return ThrowUpdate { above_threshold: self.above_threshold, event: None };
        }

        let height = cal.ankle_row_px - ball.y;
        self.peak_height_px = Some(self.peak_height_px.map_or(height, |p| p.max(height)));

        let above_head = ball.y < cal.head_row_px;
        let above_threshold = ball.y < cal.threshold_row_px;

        if above_head && !self.above_head {
            self.attempt_open = true;
        }

        let mut event = None;
        if above_threshold && !self.above_threshold {
            // Rising edge
            self.valid_throws += 1;
            self.attempt_open = false;
            event = Some(ThrowEvent::Valid);
        } else if !above_head && self.above_head && self.attempt_open {
            self.invalid_throws += 1;
            self.attempt_open = false;
            event = Some(ThrowEvent::Invalid);
        }

        self.above_head = above_head;
        self.above_threshold = above_threshold;

        ThrowUpdate { above_threshold, event }
    }

    pub fn is_above_threshold(&self) -> bool {
        self.above_threshold
    }

    pub fn valid_throws(&self) -> u32 {
        self.valid_throws
    }

    pub fn invalid_throws(&self) -> u32 {
        self.invalid_throws
    }

    pub fn total_throws(&self) -> u32 {
        self.valid_throws + self.invalid_throws
    }

    /// Highest ball position since the last call
    pub fn take_peak_height(&mut self) -> Option<f32> {
        self.peak_height_px.take()
    }

    /// Reset detector state, including calibration
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

impl Default for ThrowDetector {
    fn default() -> Self {
        Self::new(ThrowConfig::default())
    }
}
