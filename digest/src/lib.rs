//! Commit-reveal digest scheme.
//!
//! A participant commits to a result without disclosing it by publishing three
//! SHA-256 digests of a content URI and a secret nonce:
//!
//! - **vote hash** `H(content)`: salt-free fingerprint. Identical content always
//!   yields the same vote hash, so results can be grouped before reveal.
//! - **sign hash** `H(nonce ‖ content)`: binding commitment. It cannot be produced
//!   without the nonce, so a successful reveal authenticates authorship.
//! - **priv hash** `H(nonce)`: proof of possession of the nonce alone, usable to
//!   release escrowed stake without revealing the content.
//!
//! ## Module overview
//!
//! - [`uri`]: `scheme://value` content URIs and resource types.
//! - [`store`]: content-addressed object stores for `ipfs://` content.
//! - [`resolver`]: streams content and computes the digests.
//! - [`commitment`]: `Committer`, `Commitment`, `CommitmentClaims`, `verify`.
//! - [`book`]: per-round commitment registry with copy detection.
//! - [`error`]: digest error types.

pub mod book;
pub mod commitment;
pub mod error;
pub mod resolver;
pub mod store;
pub mod uri;

pub use book::{CommitmentBook, RejectReason, RevealOutcome};
pub use commitment::{prove_possession, verify, Commitment, CommitmentClaims, Committer, Reveal};
pub use error::DigestError;
pub use resolver::ContentResolver;
pub use store::{DirectoryObjectStore, ObjectStore};
pub use uri::{ContentUri, IpfsLocator, ResourceType, SCHEME_SEPARATOR};
