//! Side selection under partial occlusion
//!
//! Filming is side-on, so one leg is usually half hidden. Prefer the side the
//! estimator is clearly more confident about; otherwise the side whose
//! shoulder-to-foot extent is larger (closer to the camera).

use crate::pose::{Pose, Side};

/// Default visibility lead one side needs to win outright
pub const SIDE_MARGIN: f32 = 0.1;

/// Pick the more reliable side for this frame. Stateless.
pub fn select_side(pose: &Pose, margin: f32) -> Side {
    if !pose.is_complete() {
        return Side::Left;
    }

    let left = pose.mean_visibility(&Side::Left.landmarks().as_array());
    let right = pose.mean_visibility(&Side::Right.landmarks().as_array());

    if let (Some(left), Some(right)) = (left, right) {
        if left > right + margin {
            return Side::Left;
        }
        if right > left + margin {
            return Side::Right;
        }
    }

    match (vertical_extent(pose, Side::Left), vertical_extent(pose, Side::Right)) {
        (Some(left), Some(right)) if right >= left => Side::Right,
        _ => Side::Left,
    }
}

/// |foot.y - shoulder.y| for one side
fn vertical_extent(pose: &Pose, side: Side) -> Option<f32> {
    let ids = side.landmarks();
    let shoulder = pose.get(ids.shoulder)?.y;
    let foot = pose.get(ids.foot)?.y;
    let extent = (foot - shoulder).abs();
    extent.is_finite().then_some(extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, POSE_LANDMARK_COUNT};

    fn pose_with(left_vis: f32, right_vis: f32, left_extent: f32, right_extent: f32) -> Pose {
        let mut landmarks = vec![Landmark::default(); POSE_LANDMARK_COUNT];
        for &i in &Side::Left.landmarks().as_array() {
            landmarks[i].visibility = left_vis;
        }
        for &i in &Side::Right.landmarks().as_array() {
            landmarks[i].visibility = right_vis;
        }
        let (l, r) = (Side::Left.landmarks(), Side::Right.landmarks());
        landmarks[l.shoulder].y = 0.2;
        landmarks[l.foot].y = 0.2 + left_extent;
        landmarks[r.shoulder].y = 0.2;
        landmarks[r.foot].y = 0.2 + right_extent;
        Pose::new(landmarks, 0.0)
    }

    #[test]
    fn test_clear_visibility_winner() {
        let pose = pose_with(0.95, 0.5, 0.5, 0.7);
        assert_eq!(select_side(&pose, SIDE_MARGIN), Side::Left);
        let pose = pose_with(0.4, 0.9, 0.7, 0.5);
        assert_eq!(select_side(&pose, SIDE_MARGIN), Side::Right);
    }

    #[test]
    fn test_equal_visibility_uses_extent() {
        let pose = pose_with(0.9, 0.9, 0.6, 0.7);
        assert_eq!(select_side(&pose, SIDE_MARGIN), Side::Right);
        let pose = pose_with(0.9, 0.9, 0.7, 0.6);
        assert_eq!(select_side(&pose, SIDE_MARGIN), Side::Left);
    }

    #[test]
    fn test_within_margin_is_not_a_win() {
        // 0.05 lead is inside the hysteresis band
        let pose = pose_with(0.9, 0.85, 0.5, 0.7);
        assert_eq!(select_side(&pose, SIDE_MARGIN), Side::Right);
    }

    #[test]
    fn test_short_pose_defaults_left() {
        let pose = Pose::new(vec![Landmark::default(); 10], 0.0);
        assert_eq!(select_side(&pose, SIDE_MARGIN), Side::Left);
    }

    #[test]
    fn test_missing_extent_defaults_left() {
        let mut pose = pose_with(0.9, 0.9, 0.5, 0.7);
        pose.landmarks[Side::Right.landmarks().foot].y = f32::NAN;
        assert_eq!(select_side(&pose, SIDE_MARGIN), Side::Left);
    }
}
