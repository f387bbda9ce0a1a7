//! Declared results of a computation.

use crate::hash::Hash256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The result a participant declares for a task.
///
/// Votes are grouped by [`ResultValue::canonical_key`], never by `Display`, so
/// an integer `5` and the text `"5"` land in different groups.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultValue {
    /// A content fingerprint, typically a commitment's `vote_hash`.
    Digest(Hash256),
    /// A small numeric answer.
    Integer(i64),
    /// A textual answer.
    Text(String),
}

impl ResultValue {
    /// Canonical serialized form used as the grouping key.
    pub fn canonical_key(&self) -> String {
        match self {
            Self::Digest(h) => format!("digest:{}", h.to_hex()),
            Self::Integer(n) => format!("int:{n}"),
            Self::Text(s) => format!("text:{s}"),
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(h) => write!(f, "{h}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<Hash256> for ResultValue {
    fn from(h: Hash256) -> Self {
        Self::Digest(h)
    }
}

impl From<i64> for ResultValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<&str> for ResultValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
