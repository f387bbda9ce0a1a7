use sarmenta_types::ParticipantId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("winning group carries no weight; the kitty cannot be split")]
    NoWinnerWeight,

    #[error("winning vote of participant {0} has no recorded contribution")]
    MissingContribution(ParticipantId),

    #[error("round has not been resolved")]
    NotResolved,
}
