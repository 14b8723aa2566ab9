//! Session registry - maps session ids to their trackers
//!
//! Lives outside the per-frame core: trackers never see each other, and the
//! registry is an ordinary owned value, not global state.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::error::{Result, WallBallError};
use crate::pose::{ObjectPosition, Pose};

use super::result::{AnalysisResult, RepEvent, Stats};
use super::session::SessionTracker;

/// End-of-session record handed to persistence
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub start_ms: Option<f64>,
    pub end_ms: Option<f64>,
    pub total_reps: u32,
    pub valid_reps: u32,
    pub invalid_reps: u32,
    pub stats: Stats,
    pub reps: Vec<RepEvent>,
}

impl SessionSummary {
    pub fn from_tracker(session_id: impl Into<String>, tracker: &SessionTracker) -> Self {
        let reps = tracker.reps().to_vec();
        let valid_reps = reps.iter().filter(|r| r.valid).count() as u32;
        let total_reps = reps.len() as u32;
        let span = tracker.time_span();

        Self {
            session_id: session_id.into(),
            start_ms: span.map(|(start, _)| start),
            end_ms: span.map(|(_, end)| end),
            total_reps,
            valid_reps,
            invalid_reps: total_reps - valid_reps,
            stats: tracker.stats(),
            reps,
        }
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    config: TrackerConfig,
    sessions: HashMap<String, SessionTracker>,
}

impl SessionRegistry {
    /// New sessions are created with `config`
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
        }
    }

    /// Start a session. An existing session with the same id is replaced.
    pub fn create(&mut self, session_id: impl Into<String>) -> &mut SessionTracker {
        let session_id = session_id.into();
        log::info!("session {} started", session_id);
        let tracker = SessionTracker::new(self.config.clone());
        match self.sessions.entry(session_id) {
            Entry::Occupied(mut entry) => {
                entry.insert(tracker);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(tracker),
        }
    }

    pub fn get(&self, session_id: &str) -> Option<&SessionTracker> {
        self.sessions.get(session_id)
    }

    pub fn get_mut(&mut self, session_id: &str) -> Option<&mut SessionTracker> {
        self.sessions.get_mut(session_id)
    }

    /// Route a frame to its session
    pub fn update(
        &mut self,
        session_id: &str,
        pose: &Pose,
        image_height: f32,
        ball: Option<&ObjectPosition>,
    ) -> Result<AnalysisResult> {
        let tracker = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| WallBallError::UnknownSession(session_id.to_string()))?;
        Ok(tracker.update(pose, image_height, ball))
    }

    /// Tear down a session and return its summary
    pub fn end(&mut self, session_id: &str) -> Result<SessionSummary> {
        let tracker = self
            .sessions
            .remove(session_id)
            .ok_or_else(|| WallBallError::UnknownSession(session_id.to_string()))?;
        let summary = SessionSummary::from_tracker(session_id, &tracker);
        log::info!(
            "session {} ended: {} reps ({} valid)",
            session_id,
            summary.total_reps,
            summary.valid_reps
        );
        Ok(summary)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
