//! Consensus round state machine.
//!
//! A round is created Open, accumulates revealed votes, and becomes Resolved
//! the first time the leading group's score reaches the confidence target.
//! Abandoning a round is a caller decision: the driver simply drops it (or
//! calls [`ConsensusRound::abandon`] to recover the votes). There is no
//! internal timeout and no internal locking; a round has a single owner.

use crate::error::ConsensusError;
use crate::scoring::{score_groups, ScoreTable};
use sarmenta_credibility::CredibilityModel;
use sarmenta_types::{ParticipantId, ResultValue, Vote};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The lifecycle state of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Accepting votes.
    Open,
    /// Reached the confidence target. Terminal state.
    Resolved,
}

/// Credibility weight of one winning vote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub participant: ParticipantId,
    pub credibility: f64,
}

/// Immutable outcome of a resolved round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// The result declared by the winning group.
    pub winning_result: ResultValue,
    /// Probability that the winning result is correct.
    pub confidence_score: f64,
    /// Fixed cost contributed to the kitty.
    pub round_cost: f64,
    /// Credibility of every vote in the winning group, in vote order.
    pub contributions: Vec<Contribution>,
}

impl ConsensusResult {
    pub fn contribution_of(&self, participant: &ParticipantId) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| &c.participant == participant)
            .map(|c| c.credibility)
    }

    /// Sum of the winners' credibility weights.
    pub fn total_weight(&self) -> f64 {
        self.contributions.iter().map(|c| c.credibility).sum()
    }

    pub fn is_winner(&self, vote: &Vote) -> bool {
        vote.result.canonical_key() == self.winning_result.canonical_key()
    }
}

/// Votes collected for one task until a result is established.
#[derive(Clone, Debug)]
pub struct ConsensusRound {
    round_cost: f64,
    confidence_target: f64,
    votes: Vec<Vote>,
    participants: HashSet<ParticipantId>,
    resolved: Option<ConsensusResult>,
}

impl ConsensusRound {
    /// Open a round. `confidence_target` must lie in (0, 1) and `round_cost`
    /// must be finite and non-negative.
    pub fn new(round_cost: f64, confidence_target: f64) -> Result<Self, ConsensusError> {
        if !(confidence_target > 0.0 && confidence_target < 1.0) {
            return Err(ConsensusError::InvalidConfidenceTarget(confidence_target));
        }
        if !(round_cost.is_finite() && round_cost >= 0.0) {
            return Err(ConsensusError::InvalidRoundCost(round_cost));
        }
        Ok(Self {
            round_cost,
            confidence_target,
            votes: Vec::new(),
            participants: HashSet::new(),
            resolved: None,
        })
    }

    pub fn round_cost(&self) -> f64 {
        self.round_cost
    }

    pub fn confidence_target(&self) -> f64 {
        self.confidence_target
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn state(&self) -> RoundState {
        if self.resolved.is_some() {
            RoundState::Resolved
        } else {
            RoundState::Open
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn result(&self) -> Option<&ConsensusResult> {
        self.resolved.as_ref()
    }

    pub fn has_voted(&self, participant: &ParticipantId) -> bool {
        self.participants.contains(participant)
    }

    /// Append a vote. Rejected votes leave the round unchanged.
    ///
    /// A repeated participant is a duplicate even after resolution.
    pub fn add_vote(&mut self, vote: Vote) -> Result<(), ConsensusError> {
        if self.participants.contains(&vote.participant) {
            return Err(ConsensusError::DuplicateParticipant(vote.participant));
        }
        if self.resolved.is_some() {
            return Err(ConsensusError::RoundClosed);
        }
        if !(vote.stake.is_finite() && vote.stake >= 0.0) {
            return Err(ConsensusError::InvalidStake {
                participant: vote.participant,
                stake: vote.stake,
            });
        }
        tracing::debug!(
            participant = %vote.participant,
            result = %vote.result,
            stake = vote.stake,
            "vote added"
        );
        self.participants.insert(vote.participant.clone());
        self.votes.push(vote);
        Ok(())
    }

    /// Score every result group with the given credibility model.
    pub fn scores(&self, model: &dyn CredibilityModel) -> Result<ScoreTable, ConsensusError> {
        score_groups(&self.votes, model)
    }

    /// Attempt to resolve the round.
    ///
    /// Returns `Ok(false)` while there are no votes or the leading score is
    /// below the target. On success the result is frozen; later calls return
    /// `Ok(true)` without rescoring. Errors leave the round Open.
    pub fn try_resolve(&mut self, model: &dyn CredibilityModel) -> Result<bool, ConsensusError> {
        if self.resolved.is_some() {
            return Ok(true);
        }
        if self.votes.is_empty() {
            return Ok(false);
        }

        let table = self.scores(model)?;
        let Some(leader) = table.leader() else {
            return Ok(false);
        };

        if leader.score < self.confidence_target {
            tracing::debug!(
                leader = %leader.result,
                score = leader.score,
                target = self.confidence_target,
                votes = self.votes.len(),
                "round not yet resolved"
            );
            return Ok(false);
        }

        let winning_key = leader.result.canonical_key();
        let contributions = self
            .votes
            .iter()
            .zip(&table.credibilities)
            .filter(|(vote, _)| vote.result.canonical_key() == winning_key)
            .map(|(vote, &credibility)| Contribution {
                participant: vote.participant.clone(),
                credibility,
            })
            .collect();

        tracing::info!(
            result = %leader.result,
            score = leader.score,
            target = self.confidence_target,
            votes = self.votes.len(),
            "round resolved"
        );

        self.resolved = Some(ConsensusResult {
            winning_result: leader.result.clone(),
            confidence_score: leader.score,
            round_cost: self.round_cost,
            contributions,
        });
        Ok(true)
    }

    /// Give up on the round, returning the collected votes.
    pub fn abandon(self) -> Vec<Vote> {
        tracing::debug!(votes = self.votes.len(), resolved = self.resolved.is_some(), "round abandoned");
        self.votes
    }
}
