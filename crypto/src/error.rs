use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("nonce length must be at least 1 byte")]
    ZeroLengthNonce,
}
