//! Landmark frames from the pose estimator
//!
//! One `Pose` per video frame. Coordinates are normalized to the frame
//! (0-1, y grows downward); a non-finite coordinate means "missing".

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;
pub const LEFT_FOOT_INDEX: usize = 31;
pub const RIGHT_FOOT_INDEX: usize = 32;

/// Hip, knee and ankle of both sides (confidence gate input)
pub const LOWER_BODY: [usize; 6] = [
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 3D landmark with its detection confidence
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,  // 0-1 normalized
    pub y: f32,  // 0-1 normalized
    pub z: f32,  // Relative depth
    pub visibility: f32,  // 0-1
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Planar position, `None` if either coordinate is missing
    pub fn xy(&self) -> Option<(f32, f32)> {
        if self.x.is_finite() && self.y.is_finite() {
            Some((self.x, self.y))
        } else {
            None
        }
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, visibility: 1.0 }
    }
}

/// All landmarks of one frame plus the capture time
#[derive(Clone, Debug, Default)]
pub struct Pose {
    pub landmarks: Vec<Landmark>,
    /// Capture time in milliseconds, monotonically non-decreasing per session
    pub timestamp_ms: f64,
}

impl Pose {
    pub fn new(landmarks: Vec<Landmark>, timestamp_ms: f64) -> Self {
        Self { landmarks, timestamp_ms }
    }

    /// Frame where the estimator found nobody
    pub fn empty(timestamp_ms: f64) -> Self {
        Self { landmarks: Vec::new(), timestamp_ms }
    }

    /// True when every MediaPipe index can be addressed
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= POSE_LANDMARK_COUNT
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Mean visibility over `indices`, skipping indices that are out of range
    pub fn mean_visibility(&self, indices: &[usize]) -> Option<f32> {
        let values: Vec<f32> = indices
            .iter()
            .filter_map(|&i| self.get(i))
            .map(|lm| lm.visibility)
            .filter(|v| v.is_finite())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f32>() / values.len() as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_pose_is_incomplete() {
        let pose = Pose::new(vec![Landmark::default(); 12], 0.0);
        assert!(!pose.is_complete());
        assert!(pose.get(LEFT_HIP).is_none());
    }

    #[test]
    fn test_missing_coordinate() {
        let lm = Landmark::new(f32::NAN, 0.5, 0.0, 1.0);
        assert!(lm.xy().is_none());
    }

    #[test]
    fn test_mean_visibility_skips_out_of_range() {
        let mut landmarks = vec![Landmark::default(); 24];
        landmarks[LEFT_HIP].visibility = 0.4;
        let pose = Pose::new(landmarks, 0.0);
        // RIGHT_KNEE (26) is out of range and ignored
        let mean = pose.mean_visibility(&[LEFT_HIP, RIGHT_KNEE]).unwrap();
        assert!((mean - 0.4).abs() < 1e-6);
    }
}
