//! Nullable nonce source: deterministic commitment nonces.

use sarmenta_crypto::{CryptoError, NonceSource};
use sarmenta_types::Nonce;
use std::sync::Mutex;

/// A deterministic nonce source for testing.
///
/// Returns pre-configured byte patterns in order, cycling when exhausted.
/// Each pattern is repeated or truncated to the requested length.
pub struct NullNonceSource {
    patterns: Vec<Vec<u8>>,
    index: Mutex<usize>,
}

impl NullNonceSource {
    /// Create with a sequence of patterns. Empty patterns are dropped.
    pub fn new(patterns: Vec<Vec<u8>>) -> Self {
        Self {
            patterns: patterns.into_iter().filter(|p| !p.is_empty()).collect(),
            index: Mutex::new(0),
        }
    }

    /// Every nonce is `byte` repeated.
    pub fn constant(byte: u8) -> Self {
        Self::new(vec![vec![byte]])
    }

    /// Nonce `i` is the byte `i` repeated, so successive nonces differ.
    pub fn counting() -> Self {
        Self::new((0..=u8::MAX).map(|b| vec![b]).collect())
    }

    /// Number of nonces handed out so far.
    pub fn issued(&self) -> usize {
        *self.index.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NonceSource for NullNonceSource {
    fn next_nonce(&self, len: usize) -> Result<Nonce, CryptoError> {
        if len == 0 {
            return Err(CryptoError::ZeroLengthNonce);
        }
        if self.patterns.is_empty() {
            return Err(CryptoError::Entropy("no nonce patterns configured".into()));
        }
        let mut idx = self.index.lock().unwrap_or_else(|e| e.into_inner());
        let pattern = &self.patterns[*idx % self.patterns.len()];
        *idx += 1;
        let bytes: Vec<u8> = pattern.iter().copied().cycle().take(len).collect();
        Nonce::from_bytes(bytes).map_err(|e| CryptoError::Entropy(e.to_string()))
    }

    fn name(&self) -> &str {
        "null-nonce"
    }
}
