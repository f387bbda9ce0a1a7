//! Nullable credibility: scripted per-participant credibility.

use sarmenta_credibility::CredibilityModel;
use sarmenta_types::{ParticipantId, Vote};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A credibility model with fixed values that counts how often it is queried.
///
/// Participants without a scripted value get the default, which may be any
/// number (including out-of-range ones) so error paths can be exercised.
pub struct NullCredibility {
    values: HashMap<ParticipantId, f64>,
    default: f64,
    queries: AtomicUsize,
}

impl NullCredibility {
    pub fn new(default: f64) -> Self {
        Self {
            values: HashMap::new(),
            default,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, participant: ParticipantId, value: f64) -> Self {
        self.values.insert(participant, value);
        self
    }

    /// Number of `credibility` calls so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl CredibilityModel for NullCredibility {
    fn credibility(&self, vote: &Vote) -> f64 {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.values
            .get(&vote.participant)
            .copied()
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(p: &str) -> Vote {
        Vote::new(ParticipantId::new(p).unwrap(), "A", 1.0)
    }

    #[test]
    fn scripted_values_and_default() {
        let model = NullCredibility::new(0.5).with(ParticipantId::new("x").unwrap(), 0.9);
        assert_eq!(model.credibility(&vote("x")), 0.9);
        assert_eq!(model.credibility(&vote("y")), 0.5);
        assert_eq!(model.queries(), 2);
    }
}
