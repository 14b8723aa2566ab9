//! Squat module - phase state machine and repetition counting
//!
//! Re-exports only. All logic in submodules.

mod state;
mod rules;
mod machine;

pub use state::{SquatState, StateSequence, MAX_SEQUENCE_LEN};
pub use rules::{AngleRange, PhaseRules};
pub use machine::{
    PhaseStateMachine, RepOutcome, CycleSummary,
    ERROR_INSUFFICIENT_DEPTH, ERROR_TOO_DEEP,
};
