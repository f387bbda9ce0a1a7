use sarmenta_types::ParticipantId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("content URI has no scheme separator: {0}")]
    MissingScheme(String),

    #[error("unsupported resource type: {0}")]
    UnsupportedScheme(String),

    #[error("malformed {scheme} content: {reason}")]
    MalformedContent { scheme: String, reason: String },

    #[error("invalid nonce: {0}")]
    InvalidNonce(String),

    #[error("participant {0} has already published a commitment")]
    DuplicateCommitment(ParticipantId),

    #[error("participant {0} has not published a commitment")]
    UnknownParticipant(ParticipantId),

    #[error("participant {0} has already revealed")]
    AlreadyRevealed(ParticipantId),

    #[error("crypto error: {0}")]
    Crypto(#[from] sarmenta_crypto::CryptoError),
}

impl DigestError {
    pub(crate) fn malformed(scheme: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedContent {
            scheme: scheme.into(),
            reason: reason.to_string(),
        }
    }
}
