//! Squat + throw fusion into compound (wall ball) repetitions

/// Latches for the two halves of a wall ball rep
#[derive(Clone, Debug, Default)]
pub struct CompoundCounter {
    squat_completed: bool,
    throw_completed: bool,
    combined: u32,
}

impl CompoundCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A valid squat finished. A throw seen before it belongs to an
    /// earlier rep, so the throw latch starts over.
    pub fn on_squat(&mut self) {
        self.squat_completed = true;
        self.throw_completed = false;
    }

    /// A throw crossed the line (rising edge). Returns true if this
    /// completed a compound rep.
    pub fn on_throw(&mut self) -> bool {
        self.throw_completed = true;
        if self.squat_completed {
            self.combined += 1;
            self.squat_completed = false;
            self.throw_completed = false;
            true
        } else {
            false
        }
    }

    pub fn combined(&self) -> u32 {
        self.combined
    }

    pub fn squat_pending(&self) -> bool {
        self.squat_completed
    }

    pub fn throw_pending(&self) -> bool {
        self.throw_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squat_then_throw() {
        let mut counter = CompoundCounter::new();
        counter.on_squat();
        assert!(counter.on_throw());
        assert_eq!(counter.combined(), 1);
        assert!(!counter.squat_pending());
        assert!(!counter.throw_pending());
    }

    #[test]
    fn test_second_throw_needs_new_squat() {
        let mut counter = CompoundCounter::new();
        counter.on_squat();
        counter.on_throw();
        assert!(!counter.on_throw());
        assert_eq!(counter.combined(), 1);
    }

    #[test]
    fn test_throw_before_squat_does_not_count() {
        let mut counter = CompoundCounter::new();
        assert!(!counter.on_throw());
        assert!(counter.throw_pending());
        counter.on_squat();
        assert!(!counter.throw_pending());
        assert_eq!(counter.combined(), 0);
    }
}
