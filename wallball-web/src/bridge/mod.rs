//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod console;
mod landmarks;
mod session;

pub use console::init_logging;

pub use landmarks::{
    decode_ball,
    decode_pose,
    // Constants
    CANDIDATE_STRIDE,
    FULL_POSE_LEN,
    LANDMARK_STRIDE,
};

pub use session::WallBallSession;
