//! Discrete squat states and the per-cycle state sequence

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SquatState {
    /// s1
    #[serde(rename = "s1")]
    Standing,
    /// s2
    #[serde(rename = "s2")]
    Transition,
    /// s3
    #[serde(rename = "s3")]
    Deep,
    #[serde(rename = "unknown")]
    Unknown,
}

impl SquatState {
    pub fn name(&self) -> &'static str {
        match self {
            SquatState::Standing => "s1",
            SquatState::Transition => "s2",
            SquatState::Deep => "s3",
            SquatState::Unknown => "unknown",
        }
    }
}

/// Longest sequence the append rules can build: s2, s3, s2
pub const MAX_SEQUENCE_LEN: usize = 3;

/// States recorded since the last time the athlete stood up.
///
/// Standing is never recorded. Transition is recorded once on the way down
/// and once more on the way up (only after Deep); Deep at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StateSequence {
    states: Vec<SquatState>,
}

impl StateSequence {
    pub fn new() -> Self {
        Self { states: Vec::with_capacity(MAX_SEQUENCE_LEN) }
    }

    /// Apply the append rules. Returns true if `state` was recorded.
    pub fn record(&mut self, state: SquatState) -> bool {
        let transitions = self.count(SquatState::Transition);
        let has_deep = self.contains(SquatState::Deep);

        let accept = match state {
            SquatState::Transition => {
                (!has_deep && transitions == 0) || (has_deep && transitions == 1)
            }
            SquatState::Deep => !has_deep && transitions >= 1,
            SquatState::Standing | SquatState::Unknown => false,
        };

        if accept {
            self.states.push(state);
        }
        accept
    }

    pub fn count(&self, state: SquatState) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }

    pub fn contains(&self, state: SquatState) -> bool {
        self.states.contains(&state)
    }

    /// Exactly s2, s3, s2
    pub fn is_full_cycle(&self) -> bool {
        self.states == [SquatState::Transition, SquatState::Deep, SquatState::Transition]
    }

    /// Exactly one s2: went down but never reached depth
    pub fn is_shallow(&self) -> bool {
        self.states == [SquatState::Transition]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn as_slice(&self) -> &[SquatState] {
        &self.states
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SquatState::*;

    #[test]
    fn test_down_up_cycle() {
        let mut seq = StateSequence::new();
        for s in [Transition, Transition, Deep, Deep, Transition, Transition] {
            seq.record(s);
        }
        assert_eq!(seq.as_slice(), &[Transition, Deep, Transition]);
        assert!(seq.is_full_cycle());
    }

    #[test]
    fn test_deep_requires_transition() {
        let mut seq = StateSequence::new();
        assert!(!seq.record(Deep));
        assert!(seq.is_empty());
    }

    #[test]
    fn test_standing_and_unknown_not_recorded() {
        let mut seq = StateSequence::new();
        assert!(!seq.record(Standing));
        assert!(!seq.record(Unknown));
        assert!(seq.is_empty());
    }

    #[test]
    fn test_never_exceeds_three() {
        let mut seq = StateSequence::new();
        for _ in 0..4 {
            for s in [Transition, Deep, Transition] {
                seq.record(s);
            }
        }
        assert_eq!(seq.len(), MAX_SEQUENCE_LEN);
    }

    #[test]
    fn test_shallow() {
        let mut seq = StateSequence::new();
        seq.record(Transition);
        assert!(seq.is_shallow());
        assert!(!seq.is_full_cycle());
    }
}
