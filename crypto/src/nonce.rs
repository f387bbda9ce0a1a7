//! Secure nonce generation.

use crate::error::CryptoError;
use sarmenta_types::Nonce;

/// Source of commitment nonces.
///
/// Production code uses [`OsNonceSource`]; tests swap in a deterministic
/// source so digests are reproducible.
pub trait NonceSource: Send + Sync {
    /// Produce a fresh nonce of exactly `len` bytes.
    fn next_nonce(&self, len: usize) -> Result<Nonce, CryptoError>;

    /// Human-readable name of this source.
    fn name(&self) -> &str;
}

/// Nonces drawn from the operating system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next_nonce(&self, len: usize) -> Result<Nonce, CryptoError> {
        generate_nonce(len)
    }

    fn name(&self) -> &str {
        "os"
    }
}

/// Generate `len` bytes of OS randomness as a [`Nonce`].
pub fn generate_nonce(len: usize) -> Result<Nonce, CryptoError> {
    if len == 0 {
        return Err(CryptoError::ZeroLengthNonce);
    }
    let mut bytes = vec![0u8; len];
    getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Nonce::from_bytes(bytes).map_err(|e| CryptoError::Entropy(e.to_string()))
}
