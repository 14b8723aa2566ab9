//! Tracker module - per-session orchestration and session registry
//!
//! Re-exports only. All logic in submodules.

mod fusion;
mod result;
mod session;
mod registry;

pub use fusion::CompoundCounter;
pub use result::{AnalysisResult, FrameStatus, RepEvent, Stats};
pub use session::SessionTracker;
pub use registry::{SessionRegistry, SessionSummary};
