//! JS-facing session handle
//!
//! One `WallBallSession` per athlete session. The JS side owns the instance
//! and its lifetime; nothing here is global.

use wasm_bindgen::prelude::*;

use crate::config::TrackerConfig;
use crate::error::{Result, WallBallError};
use crate::tracker::{AnalysisResult, SessionSummary, SessionTracker};

use super::landmarks::{decode_ball, decode_pose};

fn to_js(err: WallBallError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Decode one frame and run it through the tracker
fn process_frame(
    tracker: &mut SessionTracker,
    landmarks: &[f32],
    timestamp_ms: f64,
    image_height: f32,
    candidates: Option<&[f32]>,
) -> Result<AnalysisResult> {
    let pose = decode_pose(landmarks, timestamp_ms).map_err(|e| {
        log::warn!("dropping frame at {timestamp_ms}ms: {e}");
        e
    })?;
    let ball = match candidates {
        Some(data) => decode_ball(data)?,
        None => None,
    };
    Ok(tracker.update(&pose, image_height, ball.as_ref()))
}

#[wasm_bindgen]
pub struct WallBallSession {
    tracker: SessionTracker,
}

#[wasm_bindgen]
impl WallBallSession {
    /// Session with the default (pro) thresholds
    #[wasm_bindgen(constructor)]
    pub fn new() -> WallBallSession {
        WallBallSession {
            tracker: SessionTracker::default(),
        }
    }

    /// Session from a JSON `TrackerConfig`; missing fields use defaults
    #[wasm_bindgen(js_name = "withConfig")]
    pub fn with_config(json: &str) -> std::result::Result<WallBallSession, JsValue> {
        let config = TrackerConfig::from_json(json).map_err(to_js)?;
        Ok(WallBallSession {
            tracker: SessionTracker::new(config),
        })
    }

    /// Analyze one frame.
    ///
    /// - `landmarks`: flat Float32Array, 4 floats per landmark
    /// - `candidates`: optional flat circle hits, 4 floats each
    ///
    /// Returns the AnalysisResult as JSON.
    pub fn update(
        &mut self,
        landmarks: &[f32],
        timestamp_ms: f64,
        image_height: f32,
        candidates: Option<Vec<f32>>,
    ) -> std::result::Result<String, JsValue> {
        process_frame(
            &mut self.tracker,
            landmarks,
            timestamp_ms,
            image_height,
            candidates.as_deref(),
        )
        .map(|result| result.to_json())
        .map_err(to_js)
    }

    /// Cumulative stats as JSON
    pub fn stats(&self) -> String {
        serde_json::to_string(&self.tracker.stats()).unwrap_or_default()
    }

    /// End-of-session summary as JSON
    pub fn summary(&self, session_id: &str) -> String {
        let summary = SessionSummary::from_tracker(session_id, &self.tracker);
        serde_json::to_string(&summary).unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}

impl Default for WallBallSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::FrameStatus;

    #[test]
    fn test_process_empty_frame() {
        let mut tracker = SessionTracker::default();
        let result = process_frame(&mut tracker, &[], 0.0, 720.0, None).unwrap();
        assert_eq!(result.status, FrameStatus::NoPose);
        assert_eq!(result.phase, "no_pose");
    }

    #[test]
    fn test_process_rejects_ragged_input() {
        let mut tracker = SessionTracker::default();
        assert!(process_frame(&mut tracker, &[0.0; 5], 0.0, 720.0, None).is_err());
        assert!(process_frame(&mut tracker, &[], 0.0, 720.0, Some(&[1.0, 2.0][..])).is_err());
    }

    #[test]
    fn test_result_json_uses_client_field_names() {
        let mut tracker = SessionTracker::default();
        let json = process_frame(&mut tracker, &[], 0.0, 720.0, None)
            .unwrap()
            .to_json();
        assert!(json.contains("\"totalSquats\":0"));
        assert!(json.contains("\"combinedReps\":0"));
        assert!(json.contains("\"kneeAngle\":null"));
        assert!(json.contains("\"status\":\"no_pose\""));
    }
}
