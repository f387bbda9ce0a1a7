use sarmenta_types::{ParticipantId, ResultValue};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConsensusError {
    #[error("participant {0} has already voted in this round")]
    DuplicateParticipant(ParticipantId),

    #[error("confidence target {0} is outside the open interval (0, 1)")]
    InvalidConfidenceTarget(f64),

    #[error("round cost {0} must be finite and non-negative")]
    InvalidRoundCost(f64),

    #[error("stake {stake} of participant {participant} must be finite and non-negative")]
    InvalidStake { participant: ParticipantId, stake: f64 },

    #[error("credibility {value} for participant {participant} is outside (0, 1]")]
    CredibilityOutOfRange { participant: ParticipantId, value: f64 },

    #[error("results {first} and {second} are both certain; resolution is undecidable")]
    ConflictingCertainty { first: ResultValue, second: ResultValue },

    #[error("round is already resolved")]
    RoundClosed,
}
