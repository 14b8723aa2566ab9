//! Ball position reported by the external circle detector

/// Center and diameter of a detected circular object, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectPosition {
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
    pub timestamp_ms: f64,
}

impl ObjectPosition {
    pub fn new(x: f32, y: f32, diameter: f32, timestamp_ms: f64) -> Self {
        Self { x, y, diameter, timestamp_ms }
    }

    /// Resolve several candidates to one: the largest diameter wins.
    ///
    /// Ties keep the earliest candidate. Non-finite entries are ignored.
    pub fn largest(candidates: &[ObjectPosition]) -> Option<ObjectPosition> {
        candidates
            .iter()
            .filter(|c| c.x.is_finite() && c.y.is_finite() && c.diameter.is_finite())
            .fold(None, |best: Option<ObjectPosition>, c| match best {
                Some(b) if b.diameter >= c.diameter => Some(b),
                _ => Some(*c),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_candidate_wins() {
        let candidates = [
            ObjectPosition::new(10.0, 10.0, 12.0, 0.0),
            ObjectPosition::new(50.0, 40.0, 30.0, 0.0),
            ObjectPosition::new(90.0, 70.0, 18.0, 0.0),
        ];
        let best = ObjectPosition::largest(&candidates).unwrap();
        assert_eq!(best.x, 50.0);
    }

    #[test]
    fn test_tie_keeps_first() {
        let candidates = [
            ObjectPosition::new(1.0, 1.0, 20.0, 0.0),
            ObjectPosition::new(2.0, 2.0, 20.0, 0.0),
        ];
        assert_eq!(ObjectPosition::largest(&candidates).unwrap().x, 1.0);
    }

    #[test]
    fn test_no_candidates() {
        assert!(ObjectPosition::largest(&[]).is_none());
        let bad = [ObjectPosition::new(f32::NAN, 1.0, 5.0, 0.0)];
        assert!(ObjectPosition::largest(&bad).is_none());
    }
}
