//! Wall Ball - squat and throw analysis for the browser
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! Frames flow pose → gate → knee angle → Kalman → state machine → form
//! check → throw detection → compound counter. See `tracker::SessionTracker`.

pub mod bridge;
pub mod config;
pub mod error;
pub mod physics;
pub mod pose;
pub mod squat;
pub mod tracker;

#[cfg(test)]
mod scenario_tests;

use wasm_bindgen::prelude::*;

pub use bridge::{init_logging, WallBallSession};
pub use config::TrackerConfig;
pub use error::{Result, WallBallError};
pub use pose::{Landmark, ObjectPosition, Pose, Side};
pub use tracker::{AnalysisResult, SessionRegistry, SessionSummary, SessionTracker, Stats};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
