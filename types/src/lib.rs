//! Fundamental types for the Sarmenta consensus core.
//!
//! This crate defines the value types shared by every other crate in the workspace:
//! participant identities, 256-bit digests, commitment nonces, declared results and votes.

pub mod error;
pub mod hash;
pub mod nonce;
pub mod participant;
pub mod result;
pub mod vote;

pub use error::TypesError;
pub use hash::Hash256;
pub use nonce::Nonce;
pub use participant::ParticipantId;
pub use result::ResultValue;
pub use vote::Vote;
