//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the commit-reveal and consensus code (nonce
//! entropy, content-addressed storage, credibility history) sits behind a
//! trait. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod credibility;
pub mod nonce;
pub mod object_store;

pub use credibility::NullCredibility;
pub use nonce::NullNonceSource;
pub use object_store::NullObjectStore;
