//! Flat-array decoding for data coming from JavaScript
//!
//! MediaPipe results arrive as one Float32Array per frame (x, y, z,
//! visibility per landmark); circle detector hits as (x, y, diameter,
//! timestamp) quadruples.

use crate::error::{Result, WallBallError};
use crate::pose::{Landmark, ObjectPosition, Pose, POSE_LANDMARK_COUNT};

/// Floats per landmark: x, y, z, visibility
pub const LANDMARK_STRIDE: usize = 4;

/// Floats per ball candidate: x, y, diameter, timestamp
pub const CANDIDATE_STRIDE: usize = 4;

/// Floats in a full pose (33 landmarks × 4)
pub const FULL_POSE_LEN: usize = POSE_LANDMARK_COUNT * LANDMARK_STRIDE;

/// Decode a flat landmark buffer.
///
/// Any multiple of 4 is accepted; fewer than 33 landmarks is a valid
/// "no detection" frame. Extra landmarks beyond 33 are kept.
pub fn decode_pose(data: &[f32], timestamp_ms: f64) -> Result<Pose> {
    if data.len() % LANDMARK_STRIDE != 0 {
        return Err(WallBallError::MalformedLandmarks { len: data.len() });
    }

    let landmarks = data
        .chunks_exact(LANDMARK_STRIDE)
        .map(|c| Landmark::new(c[0], c[1], c[2], c[3]))
        .collect();

    Ok(Pose::new(landmarks, timestamp_ms))
}

/// Decode ball candidates and keep the largest one
pub fn decode_ball(data: &[f32]) -> Result<Option<ObjectPosition>> {
    if data.len() % CANDIDATE_STRIDE != 0 {
        return Err(WallBallError::MalformedCandidates { len: data.len() });
    }

    let candidates: Vec<ObjectPosition> = data
        .chunks_exact(CANDIDATE_STRIDE)
        .map(|c| ObjectPosition::new(c[0], c[1], c[2], c[3] as f64))
        .collect();

    Ok(ObjectPosition::largest(&candidates))
}
