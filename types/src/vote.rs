//! A revealed vote.

use crate::participant::ParticipantId;
use crate::result::ResultValue;
use serde::{Deserialize, Serialize};

/// One participant's revealed vote in a consensus round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Who cast the vote. Unique within a round.
    pub participant: ParticipantId,
    /// The declared result.
    pub result: ResultValue,
    /// Amount staked on the result; forfeited if the result loses.
    pub stake: f64,
}

impl Vote {
    pub fn new(participant: ParticipantId, result: impl Into<ResultValue>, stake: f64) -> Self {
        Self {
            participant,
            result: result.into(),
            stake,
        }
    }
}
