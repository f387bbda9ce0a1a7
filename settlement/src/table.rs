//! Transaction table handed to the ledger.

use sarmenta_types::{ParticipantId, ResultValue};
use serde::{Deserialize, Serialize};

/// A signed transfer for one participant: positive is a payout, negative a
/// forfeited stake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub participant: ParticipantId,
    pub amount: f64,
    /// Whether the participant voted for the winning result.
    pub won: bool,
}

/// Settlement of one round, one entry per vote in vote order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionTable {
    pub winning_result: ResultValue,
    /// Round cost plus every forfeited losing stake.
    pub kitty: f64,
    pub entries: Vec<Transaction>,
}

impl TransactionTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn amount_for(&self, participant: &ParticipantId) -> Option<f64> {
        self.entries
            .iter()
            .find(|t| &t.participant == participant)
            .map(|t| t.amount)
    }

    pub fn winners(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter().filter(|t| t.won)
    }

    pub fn losers(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter().filter(|t| !t.won)
    }

    /// Sum of every winner's payout. Equals the kitty up to rounding.
    pub fn total_paid_to_winners(&self) -> f64 {
        self.winners().map(|t| t.amount).sum()
    }

    /// Sum of every entry. Losers' forfeits cancel against the winners' share
    /// of them, so this equals the round cost up to rounding.
    pub fn net(&self) -> f64 {
        self.entries.iter().map(|t| t.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(p: &str, amount: f64, won: bool) -> Transaction {
        Transaction {
            participant: ParticipantId::new(p).unwrap(),
            amount,
            won,
        }
    }

    fn table() -> TransactionTable {
        TransactionTable {
            winning_result: ResultValue::from("A"),
            kitty: 3.0,
            entries: vec![entry("a", 1.5, true), entry("b", -2.0, false), entry("c", 1.5, true)],
        }
    }

    #[test]
    fn lookups() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert_eq!(t.amount_for(&ParticipantId::new("b").unwrap()), Some(-2.0));
        assert_eq!(t.amount_for(&ParticipantId::new("zz").unwrap()), None);
        assert_eq!(t.winners().count(), 2);
        assert_eq!(t.losers().count(), 1);
    }

    #[test]
    fn totals() {
        let t = table();
        assert_eq!(t.total_paid_to_winners(), 3.0);
        assert_eq!(t.net(), 1.0);
    }
}
