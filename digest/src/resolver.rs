//! Reads committed content and computes its digests.

use crate::error::DigestError;
use crate::store::ObjectStore;
use crate::uri::{ContentUri, IpfsLocator, ResourceType};
use sarmenta_crypto::{sha256, sha256_multi, sha256_reader_pair};
use sarmenta_types::{Hash256, Nonce};
use std::fs::File;
use std::sync::Arc;

/// Resolves content URIs to `(vote_hash, sign_hash)` pairs.
///
/// In-memory resource types are hashed directly; files and stored objects are
/// streamed once, feeding both running hashes from the same chunks.
#[derive(Clone, Default)]
pub struct ContentResolver {
    store: Option<Arc<dyn ObjectStore>>,
}

impl ContentResolver {
    /// A resolver with no object store: `ipfs://` content cannot be read.
    pub fn new() -> Self {
        Self { store: None }
    }

    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Compute `(H(content), H(nonce ‖ content))`.
    pub fn digests(&self, uri: &ContentUri, nonce: &Nonce) -> Result<(Hash256, Hash256), DigestError> {
        let salt = nonce.as_bytes();
        match uri.resource_type() {
            ResourceType::Raw => {
                let bytes = hex::decode(uri.value()).map_err(|e| DigestError::malformed("raw", e))?;
                Ok((sha256(&bytes), sha256_multi(&[salt, &bytes])))
            }
            ResourceType::Str => {
                let bytes = uri.value().as_bytes();
                Ok((sha256(bytes), sha256_multi(&[salt, bytes])))
            }
            ResourceType::File => {
                let file = File::open(uri.value())
                    .map_err(|e| DigestError::malformed("file", format!("{}: {e}", uri.value())))?;
                sha256_reader_pair(salt, file)
                    .map_err(|e| DigestError::malformed("file", format!("{}: {e}", uri.value())))
            }
            ResourceType::Ipfs => {
                let store = self
                    .store
                    .as_ref()
                    .ok_or_else(|| DigestError::malformed("ipfs", "no object store configured"))?;
                let locator = IpfsLocator::parse(uri.value())?;
                let reader = store
                    .open(&locator)
                    .map_err(|e| DigestError::malformed("ipfs", format!("{}: {e}", locator.cid)))?;
                sha256_reader_pair(salt, reader)
                    .map_err(|e| DigestError::malformed("ipfs", format!("{}: {e}", locator.cid)))
            }
        }
    }

    /// `H(nonce)`.
    pub fn priv_hash(nonce: &Nonce) -> Hash256 {
        sha256(nonce.as_bytes())
    }
}

impl std::fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentResolver")
            .field("store", &self.store.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}
