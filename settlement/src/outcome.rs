//! Payout computation for a resolved round.
//!
//! ```text
//! kitty        = round_cost + Σ stake(v)            v a losing vote
//! payout(v)    = kitty · w(v) / Σ w(winners)        v a winning vote
//! payout(v)    = -stake(v)                          v a losing vote
//! ```
//!
//! `w(v)` is the vote's credibility contribution, or `-ln(1 - cr)` under
//! [`Weighting::LogOdds`].

use crate::error::SettlementError;
use crate::table::{Transaction, TransactionTable};
use sarmenta_consensus::{ConsensusResult, ConsensusRound};
use sarmenta_credibility::{log_odds_weight, Credibility, DEFAULT_EPSILON};
use sarmenta_types::Vote;
use serde::{Deserialize, Serialize};

/// How winners' shares of the kitty are weighted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weighting {
    /// Proportional to credibility.
    #[default]
    Credibility,
    /// Proportional to `-ln(1 - credibility)`.
    LogOdds,
}

impl Weighting {
    fn weight(self, credibility: f64) -> f64 {
        match self {
            Self::Credibility => credibility,
            // Clamped so a certain voter gets a large finite weight.
            Self::LogOdds => log_odds_weight(Credibility::clamped(credibility, DEFAULT_EPSILON)),
        }
    }
}

/// Settle with credibility weights.
pub fn settle(result: &ConsensusResult, votes: &[Vote]) -> Result<TransactionTable, SettlementError> {
    settle_with(result, votes, Weighting::Credibility)
}

/// Settle a resolved round using the chosen weighting.
pub fn settle_with(
    result: &ConsensusResult,
    votes: &[Vote],
    weighting: Weighting,
) -> Result<TransactionTable, SettlementError> {
    let winning_key = result.winning_result.canonical_key();

    let mut kitty = result.round_cost;
    let mut winners: Vec<(usize, f64)> = Vec::new();
    for (i, vote) in votes.iter().enumerate() {
        if vote.result.canonical_key() == winning_key {
            let credibility = result
                .contribution_of(&vote.participant)
                .ok_or_else(|| SettlementError::MissingContribution(vote.participant.clone()))?;
            winners.push((i, weighting.weight(credibility)));
        } else {
            kitty += vote.stake;
        }
    }

    let total_weight: f64 = winners.iter().map(|(_, w)| w).sum();
    if !(total_weight > 0.0 && total_weight.is_finite()) {
        return Err(SettlementError::NoWinnerWeight);
    }

    let mut payouts = vec![None; votes.len()];
    for (i, weight) in winners {
        payouts[i] = Some(kitty * weight / total_weight);
    }

    let entries: Vec<Transaction> = votes
        .iter()
        .zip(payouts)
        .map(|(vote, payout)| match payout {
            Some(amount) => Transaction {
                participant: vote.participant.clone(),
                amount,
                won: true,
            },
            None => Transaction {
                participant: vote.participant.clone(),
                amount: -vote.stake,
                won: false,
            },
        })
        .collect();

    tracing::info!(
        result = %result.winning_result,
        kitty,
        winners = entries.iter().filter(|t| t.won).count(),
        losers = entries.iter().filter(|t| !t.won).count(),
        ?weighting,
        "round settled"
    );

    Ok(TransactionTable {
        winning_result: result.winning_result.clone(),
        kitty,
        entries,
    })
}

/// Settle a round that has already been resolved.
pub fn settle_round(round: &ConsensusRound, weighting: Weighting) -> Result<TransactionTable, SettlementError> {
    let result = round.result().ok_or(SettlementError::NotResolved)?;
    settle_with(result, round.votes(), weighting)
}

/// Settlement methods on [`ConsensusRound`].
pub trait SettleRound {
    fn settle(&self) -> Result<TransactionTable, SettlementError> {
        self.settle_with(Weighting::Credibility)
    }

    fn settle_with(&self, weighting: Weighting) -> Result<TransactionTable, SettlementError>;
}

impl SettleRound for ConsensusRound {
    fn settle_with(&self, weighting: Weighting) -> Result<TransactionTable, SettlementError> {
        settle_round(self, weighting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarmenta_consensus::Contribution;
    use sarmenta_types::{ParticipantId, ResultValue};

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::new(s).unwrap()
    }

    fn vote(p: &str, result: &str, stake: f64) -> Vote {
        Vote::new(pid(p), result, stake)
    }

    fn resolved(winners: &[(&str, f64)], round_cost: f64) -> ConsensusResult {
        ConsensusResult {
            winning_result: ResultValue::from("A"),
            confidence_score: 0.999,
            round_cost,
            contributions: winners
                .iter()
                .map(|(p, c)| Contribution {
                    participant: pid(p),
                    credibility: *c,
                })
                .collect(),
        }
    }

    #[test]
    fn four_winners_split_kitty_of_two() {
        let votes = vec![
            vote("a", "A", 1.0),
            vote("b", "A", 1.0),
            vote("c", "A", 1.0),
            vote("d", "A", 1.0),
            vote("e", "B", 1.0),
        ];
        let result = resolved(&[("a", 0.9), ("b", 0.9), ("c", 0.9), ("d", 0.9)], 1.0);
        let table = settle(&result, &votes).unwrap();

        assert_eq!(table.kitty, 2.0);
        for p in ["a", "b", "c", "d"] {
            assert!((table.amount_for(&pid(p)).unwrap() - 0.5).abs() < 1e-12);
        }
        assert_eq!(table.amount_for(&pid("e")), Some(-1.0));
        assert!((table.total_paid_to_winners() - 2.0).abs() < 1e-12);
        assert!((table.net() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn payouts_follow_credibility() {
        let votes = vec![vote("hi", "A", 1.0), vote("lo", "A", 1.0), vote("x", "B", 3.0)];
        let result = resolved(&[("hi", 0.9), ("lo", 0.6)], 0.0);
        let table = settle(&result, &votes).unwrap();
        assert_eq!(table.kitty, 3.0);
        assert!((table.amount_for(&pid("hi")).unwrap() - 1.8).abs() < 1e-12);
        assert!((table.amount_for(&pid("lo")).unwrap() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn log_odds_favours_high_credibility() {
        let votes = vec![vote("hi", "A", 1.0), vote("lo", "A", 1.0), vote("x", "B", 1.0)];
        let result = resolved(&[("hi", 0.99), ("lo", 0.9)], 1.0);
        let linear = settle(&result, &votes).unwrap();
        let log = settle_with(&result, &votes, Weighting::LogOdds).unwrap();

        let hi_linear = linear.amount_for(&pid("hi")).unwrap();
        let hi_log = log.amount_for(&pid("hi")).unwrap();
        assert!(hi_log > hi_linear);
        // ln(100) / (ln(100) + ln(10)) = 2/3
        assert!((hi_log - 2.0 * 2.0 / 3.0).abs() < 1e-9);
        assert!((log.total_paid_to_winners() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn log_odds_handles_certain_voter() {
        let votes = vec![vote("sure", "A", 1.0), vote("x", "B", 1.0)];
        let result = resolved(&[("sure", 1.0)], 0.0);
        let table = settle_with(&result, &votes, Weighting::LogOdds).unwrap();
        assert!((table.amount_for(&pid("sure")).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unanimous_round_pays_round_cost() {
        let votes = vec![vote("a", "A", 5.0), vote("b", "A", 5.0)];
        let result = resolved(&[("a", 0.8), ("b", 0.8)], 4.0);
        let table = settle(&result, &votes).unwrap();
        assert_eq!(table.kitty, 4.0);
        assert_eq!(table.amount_for(&pid("a")), Some(2.0));
        assert_eq!(table.losers().count(), 0);
    }

    #[test]
    fn zero_winner_weight_rejected() {
        let votes = vec![vote("a", "A", 1.0), vote("x", "B", 1.0)];
        let result = resolved(&[("a", 0.0)], 1.0);
        assert_eq!(settle(&result, &votes), Err(SettlementError::NoWinnerWeight));
    }

    #[test]
    fn no_winning_votes_rejected() {
        let votes = vec![vote("x", "B", 1.0)];
        let result = resolved(&[], 1.0);
        assert_eq!(settle(&result, &votes), Err(SettlementError::NoWinnerWeight));
    }

    #[test]
    fn winning_vote_without_contribution_rejected() {
        let votes = vec![vote("a", "A", 1.0), vote("ghost", "A", 1.0)];
        let result = resolved(&[("a", 0.9)], 1.0);
        assert_eq!(
            settle(&result, &votes),
            Err(SettlementError::MissingContribution(pid("ghost")))
        );
    }

    #[test]
    fn open_round_cannot_settle() {
        let mut round = ConsensusRound::new(1.0, 0.999).unwrap();
        round.add_vote(vote("a", "A", 1.0)).unwrap();
        assert_eq!(round.settle(), Err(SettlementError::NotResolved));
    }

    #[test]
    fn settle_resolved_round() {
        let mut round = ConsensusRound::new(1.0, 0.99).unwrap();
        for p in ["a", "b", "c", "d"] {
            round.add_vote(vote(p, "A", 1.0)).unwrap();
        }
        round.add_vote(vote("e", "B", 1.0)).unwrap();
        assert!(round.try_resolve(&|_: &Vote| 0.9).unwrap());

        let table = round.settle().unwrap();
        assert_eq!(table.winning_result, ResultValue::from("A"));
        assert!((table.amount_for(&pid("a")).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(table.amount_for(&pid("e")), Some(-1.0));
    }

    #[test]
    fn table_serializes_with_signed_amounts() {
        let votes = vec![vote("a", "A", 1.0), vote("x", "B", 2.0)];
        let result = resolved(&[("a", 0.9)], 1.0);
        let json = serde_json::to_value(settle(&result, &votes).unwrap()).unwrap();
        assert_eq!(json["kitty"], 3.0);
        assert_eq!(json["entries"][1]["amount"], -2.0);
        assert_eq!(json["entries"][1]["won"], false);
    }
}
