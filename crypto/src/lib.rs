//! Cryptographic primitives for Sarmenta commitments.
//!
//! - **SHA-256** for every commitment digest (one-shot, multi-part and chunked streaming)
//! - **OS CSPRNG** nonce generation for the secret half of a commitment

pub mod error;
pub mod hash;
pub mod nonce;

pub use error::CryptoError;
pub use hash::{sha256, sha256_multi, sha256_reader, sha256_reader_pair, CHUNK_SIZE};
pub use nonce::{generate_nonce, NonceSource, OsNonceSource};
