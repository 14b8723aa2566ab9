//! Pose module - landmark frames, body sides and ball positions
//!
//! Re-exports only. All logic in submodules.

mod landmarks;
mod object;
mod side;

pub use landmarks::{
    Landmark, Pose,
    // Constants
    POSE_LANDMARK_COUNT, NOSE,
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
    LEFT_FOOT_INDEX, RIGHT_FOOT_INDEX,
    LOWER_BODY,
};
pub use object::ObjectPosition;
pub use side::{Side, SideLandmarks};
