//! Commitments: creation, reveal and verification.

use crate::error::DigestError;
use crate::resolver::ContentResolver;
use crate::uri::{ContentUri, ResourceType};
use sarmenta_crypto::{NonceSource, OsNonceSource};
use sarmenta_types::nonce::DEFAULT_NONCE_LEN;
use sarmenta_types::{Hash256, Nonce};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The three digests a participant publishes at commit time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitmentClaims {
    /// `H(content)`.
    pub vote_hash: Hash256,
    /// `H(nonce ‖ content)`.
    pub sign_hash: Hash256,
    /// `H(nonce)`.
    pub priv_hash: Hash256,
}

impl CommitmentClaims {
    /// Check a reveal against these claims, reading content through `resolver`.
    ///
    /// Returns `false` on any mismatch and also when the content cannot be
    /// read or parsed: a failed reveal is an outcome, not an error.
    pub fn verify(&self, resolver: &ContentResolver, content: &str, nonce: &Nonce) -> bool {
        let recomputed = match recompute(resolver, content, nonce) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "reveal content could not be hashed");
                return false;
            }
        };
        let valid = recomputed == *self;
        if !valid {
            tracing::debug!(vote_hash = %self.vote_hash, "reveal does not match commitment");
        }
        valid
    }
}

fn recompute(
    resolver: &ContentResolver,
    content: &str,
    nonce: &Nonce,
) -> Result<CommitmentClaims, DigestError> {
    let uri = ContentUri::parse(content)?;
    let (vote_hash, sign_hash) = resolver.digests(&uri, nonce)?;
    Ok(CommitmentClaims {
        vote_hash,
        sign_hash,
        priv_hash: ContentResolver::priv_hash(nonce),
    })
}

/// The secret material disclosed at reveal time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    /// Content URI, `scheme://value`.
    pub content: String,
    /// The commitment nonce (hex on the wire).
    pub nonce: Nonce,
}

/// One participant's hidden contribution for one round.
///
/// Immutable once constructed. The digests are computed eagerly at commit
/// time; `Debug` never prints the nonce.
#[derive(Clone)]
pub struct Commitment {
    uri: ContentUri,
    nonce: Nonce,
    claims: CommitmentClaims,
}

impl Commitment {
    pub fn resource_type(&self) -> ResourceType {
        self.uri.resource_type()
    }

    pub fn content(&self) -> &ContentUri {
        &self.uri
    }

    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    pub fn vote_hash(&self) -> Hash256 {
        self.claims.vote_hash
    }

    pub fn sign_hash(&self) -> Hash256 {
        self.claims.sign_hash
    }

    pub fn priv_hash(&self) -> Hash256 {
        self.claims.priv_hash
    }

    /// The public half, safe to publish before reveal.
    pub fn claims(&self) -> CommitmentClaims {
        self.claims
    }

    /// Disclose content and nonce. Idempotent.
    pub fn reveal(&self) -> Reveal {
        Reveal {
            content: self.uri.to_string(),
            nonce: self.nonce.clone(),
        }
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("resource_type", &self.uri.resource_type())
            .field("nonce", &self.nonce)
            .field("claims", &self.claims)
            .finish()
    }
}

/// Creates commitments with a fixed nonce length and content resolver.
#[derive(Clone)]
pub struct Committer {
    nonce_len: usize,
    nonce_source: Arc<dyn NonceSource>,
    resolver: ContentResolver,
}

impl Committer {
    /// OS randomness, 32-byte nonces, no object store.
    pub fn new() -> Self {
        Self {
            nonce_len: DEFAULT_NONCE_LEN,
            nonce_source: Arc::new(OsNonceSource),
            resolver: ContentResolver::new(),
        }
    }

    pub fn with_nonce_len(mut self, nonce_len: usize) -> Self {
        self.nonce_len = nonce_len;
        self
    }

    pub fn with_nonce_source(mut self, source: Arc<dyn NonceSource>) -> Self {
        self.nonce_source = source;
        self
    }

    pub fn with_resolver(mut self, resolver: ContentResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn nonce_len(&self) -> usize {
        self.nonce_len
    }

    pub fn resolver(&self) -> &ContentResolver {
        &self.resolver
    }

    /// Commit to a `scheme://value` URI with a fresh nonce.
    pub fn commit(&self, uri: &str) -> Result<Commitment, DigestError> {
        self.commit_uri(ContentUri::parse(uri)?)
    }

    /// Commit to `value` interpreted as `resource_type`.
    pub fn commit_parts(
        &self,
        resource_type: ResourceType,
        value: impl Into<String>,
    ) -> Result<Commitment, DigestError> {
        self.commit_uri(ContentUri::new(resource_type, value)?)
    }

    pub fn commit_uri(&self, uri: ContentUri) -> Result<Commitment, DigestError> {
        let nonce = self.nonce_source.next_nonce(self.nonce_len)?;
        if nonce.len() != self.nonce_len {
            return Err(DigestError::InvalidNonce(format!(
                "{} returned {} bytes, expected {}",
                self.nonce_source.name(),
                nonce.len(),
                self.nonce_len
            )));
        }
        self.commit_with_nonce(uri, nonce)
    }

    /// Rebuild a commitment from known secret material.
    pub fn commit_with_nonce(&self, uri: ContentUri, nonce: Nonce) -> Result<Commitment, DigestError> {
        let (vote_hash, sign_hash) = self.resolver.digests(&uri, &nonce)?;
        let claims = CommitmentClaims {
            vote_hash,
            sign_hash,
            priv_hash: ContentResolver::priv_hash(&nonce),
        };
        tracing::debug!(
            resource_type = %uri.resource_type(),
            vote_hash = %claims.vote_hash,
            "commitment created"
        );
        Ok(Commitment { uri, nonce, claims })
    }

    /// Verify a reveal using this committer's resolver.
    pub fn verify(&self, claims: &CommitmentClaims, content: &str, nonce: &Nonce) -> bool {
        claims.verify(&self.resolver, content, nonce)
    }
}

impl Default for Committer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Committer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Committer")
            .field("nonce_len", &self.nonce_len)
            .field("nonce_source", &self.nonce_source.name())
            .field("resolver", &self.resolver)
            .finish()
    }
}

/// Recompute all three digests from a reveal and compare with the claims.
///
/// Uses a resolver without an object store; use [`Committer::verify`] for
/// `ipfs://` content.
pub fn verify(
    claimed_vote_hash: &Hash256,
    claimed_sign_hash: &Hash256,
    claimed_priv_hash: &Hash256,
    content: &str,
    nonce: &Nonce,
) -> bool {
    let claims = CommitmentClaims {
        vote_hash: *claimed_vote_hash,
        sign_hash: *claimed_sign_hash,
        priv_hash: *claimed_priv_hash,
    };
    claims.verify(&ContentResolver::new(), content, nonce)
}

/// Check possession of the nonce against `priv_hash` alone, without the content.
pub fn prove_possession(claims: &CommitmentClaims, nonce: &Nonce) -> bool {
    ContentResolver::priv_hash(nonce) == claims.priv_hash
}
