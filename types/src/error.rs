//! Parsing errors for the shared value types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("nonce must not be empty")]
    EmptyNonce,

    #[error("participant identity must not be empty")]
    EmptyParticipant,
}
