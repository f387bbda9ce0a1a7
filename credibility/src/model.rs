//! The credibility capability and stock models.

use crate::credibility::{Credibility, DEFAULT_EPSILON};
use crate::error::CredibilityError;
use sarmenta_types::{ParticipantId, Vote};
use std::collections::HashMap;

/// Maps a vote to the probability that it is honest.
///
/// Implementations must be pure: the engine may call them repeatedly, and
/// callers may share one model across rounds running on different threads.
/// Returned values must lie in (0, 1).
pub trait CredibilityModel: Send + Sync {
    fn credibility(&self, vote: &Vote) -> f64;
}

impl<F> CredibilityModel for F
where
    F: Fn(&Vote) -> f64 + Send + Sync,
{
    fn credibility(&self, vote: &Vote) -> f64 {
        self(vote)
    }
}

/// Every vote gets the same credibility.
#[derive(Clone, Copy, Debug)]
pub struct ConstantCredibility(pub Credibility);

impl ConstantCredibility {
    pub fn new(p: f64) -> Result<Self, CredibilityError> {
        Ok(Self(Credibility::new(p)?))
    }
}

impl CredibilityModel for ConstantCredibility {
    fn credibility(&self, _vote: &Vote) -> f64 {
        self.0.value()
    }
}

/// Per-participant credibility with a fallback for unknown participants.
#[derive(Clone, Debug)]
pub struct TableCredibility {
    values: HashMap<ParticipantId, Credibility>,
    default: Credibility,
}

impl TableCredibility {
    pub fn new(default: Credibility) -> Self {
        Self {
            values: HashMap::new(),
            default,
        }
    }

    pub fn with(mut self, participant: ParticipantId, credibility: Credibility) -> Self {
        self.values.insert(participant, credibility);
        self
    }

    pub fn insert(&mut self, participant: ParticipantId, credibility: Credibility) {
        self.values.insert(participant, credibility);
    }

    pub fn get(&self, participant: &ParticipantId) -> Credibility {
        self.values.get(participant).copied().unwrap_or(self.default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl CredibilityModel for TableCredibility {
    fn credibility(&self, vote: &Vote) -> f64 {
        self.get(&vote.participant).value()
    }
}

/// Spot-check credibility `CR = 1 - f / (k + 1)`.
///
/// `f` is the assumed fraction of faulty participants and `k` the number of
/// a participant's past results that were validated. A newcomer (`k = 0`)
/// starts at `1 - f`; credibility approaches 1 as validated work accumulates.
/// Results are clamped to stay below 1 for very large `k`.
#[derive(Clone, Debug)]
pub struct HistoryCredibility {
    faulty_fraction: f64,
    history: HashMap<ParticipantId, u64>,
}

impl HistoryCredibility {
    pub fn new(faulty_fraction: f64) -> Result<Self, CredibilityError> {
        if !(faulty_fraction > 0.0 && faulty_fraction < 1.0) {
            return Err(CredibilityError::InvalidFaultyFraction(faulty_fraction));
        }
        Ok(Self {
            faulty_fraction,
            history: HashMap::new(),
        })
    }

    pub fn faulty_fraction(&self) -> f64 {
        self.faulty_fraction
    }

    pub fn set_validated(&mut self, participant: ParticipantId, count: u64) {
        self.history.insert(participant, count);
    }

    /// Record one more validated result for `participant`.
    pub fn record_validated(&mut self, participant: &ParticipantId) {
        *self.history.entry(participant.clone()).or_insert(0) += 1;
    }

    pub fn validated(&self, participant: &ParticipantId) -> u64 {
        self.history.get(participant).copied().unwrap_or(0)
    }

    pub fn for_count(&self, k: u64) -> Credibility {
        Credibility::clamped(1.0 - self.faulty_fraction / (k as f64 + 1.0), DEFAULT_EPSILON)
    }
}

impl CredibilityModel for HistoryCredibility {
    fn credibility(&self, vote: &Vote) -> f64 {
        self.for_count(self.validated(&vote.participant)).value()
    }
}

/// Wraps a model, clamping its output into `[eps, 1 - eps]`.
#[derive(Clone, Debug)]
pub struct Clamped<M> {
    inner: M,
    epsilon: f64,
}

impl<M: CredibilityModel> Clamped<M> {
    pub fn new(inner: M, epsilon: f64) -> Result<Self, CredibilityError> {
        if !(epsilon >= f64::EPSILON && epsilon < 0.5) {
            return Err(CredibilityError::InvalidEpsilon(epsilon));
        }
        Ok(Self { inner, epsilon })
    }

    pub fn with_default_epsilon(inner: M) -> Self {
        Self {
            inner,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: CredibilityModel> CredibilityModel for Clamped<M> {
    fn credibility(&self, vote: &Vote) -> f64 {
        Credibility::clamped(self.inner.credibility(vote), self.epsilon).value()
    }
}
