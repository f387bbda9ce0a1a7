//! Secret commitment nonce.

use crate::error::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Default nonce length in bytes (256 bits of entropy).
pub const DEFAULT_NONCE_LEN: usize = 32;

/// The secret random value mixed into a commitment's `sign_hash` and `priv_hash`.
///
/// Raw bytes internally; hexadecimal on the wire. `Debug` never prints the
/// secret material.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Nonce(Vec<u8>);

impl Nonce {
    /// Wrap raw nonce bytes. An empty nonce provides no secrecy and is rejected.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, TypesError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TypesError::EmptyNonce);
        }
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let bytes = hex::decode(s).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({} bytes)", self.0.len())
    }
}

impl Serialize for Nonce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Nonce {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
