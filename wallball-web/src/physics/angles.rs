//! Joint angle calculation using dot product
//!
//! Planar (x, y) only; z from the pose estimator is too noisy for depth
//! decisions. Degenerate geometry yields `None`, never NaN.

use crate::pose::Landmark;

/// Below this a vector is treated as zero-length
const MIN_MAGNITUDE: f32 = 1e-6;

/// Angle in degrees between rays `vertex→a` and `vertex→b`
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
fn angle_between(a: (f32, f32), b: (f32, f32), vertex: (f32, f32)) -> Option<f32> {
    let v1 = (a.0 - vertex.0, a.1 - vertex.1);
    let v2 = (b.0 - vertex.0, b.1 - vertex.1);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    if !(mag1 >= MIN_MAGNITUDE && mag2 >= MIN_MAGNITUDE) {
        return None;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    let angle = cos_angle.acos().to_degrees();

    angle.is_finite().then_some(angle)
}

/// Angle at vertex `b` between `b→a` and `b→c`, in [0, 180]
pub fn joint_angle(a: &Landmark, b: &Landmark, c: &Landmark) -> Option<f32> {
    angle_between(a.xy()?, c.xy()?, b.xy()?)
}

/// Angle between `p1` and `p2` as seen from `reference`
///
/// `None` when either point coincides with the reference or a coordinate is
/// missing.
pub fn angle_about_reference(p1: &Landmark, p2: &Landmark, reference: &Landmark) -> Option<f32> {
    angle_between(p1.xy()?, p2.xy()?, reference.xy()?)
}

/// Same as [`angle_about_reference`] with the frame origin as reference
pub fn angle_about_origin(p1: &Landmark, p2: &Landmark) -> Option<f32> {
    angle_between(p1.xy()?, p2.xy()?, (0.0, 0.0))
}

/// Angle of segment `pivot→point` from the vertical line through `pivot`
/// towards `reference_y` (1.0 = frame bottom)
///
/// 0° when the segment hangs straight towards the reference row. Unlike a
/// single-point angle against the frame origin, this measures a body
/// segment, so the pivot joint is explicit.
pub fn vertical_angle(pivot: &Landmark, point: &Landmark, reference_y: f32) -> Option<f32> {
    let (px, py) = pivot.xy()?;
    angle_between(point.xy()?, (px, reference_y), (px, py))
}
