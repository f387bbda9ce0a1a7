//! Per-round registry of published commitments.
//!
//! Participants publish [`CommitmentClaims`] during the commit phase and later
//! reveal. The book turns accepted reveals into [`Vote`]s whose result is the
//! content fingerprint (`vote_hash`), and flags copied commitments: an honest
//! participant cannot produce someone else's `sign_hash` without their nonce,
//! so a repeated `sign_hash` means the later publisher copied it.

use crate::commitment::{CommitmentClaims, Reveal};
use crate::error::DigestError;
use crate::resolver::ContentResolver;
use sarmenta_types::{Hash256, ParticipantId, ResultValue, Vote};
use std::collections::HashMap;

/// Why a reveal was not turned into a vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Content and nonce do not reproduce the published digests.
    Mismatch,
    /// The published `sign_hash` was first published by `original`.
    Copied { original: ParticipantId },
}

/// Result of processing one reveal.
#[derive(Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    Accepted(Vote),
    Rejected {
        participant: ParticipantId,
        reason: RejectReason,
    },
}

#[derive(Clone, Debug)]
struct Entry {
    participant: ParticipantId,
    claims: CommitmentClaims,
    revealed: bool,
}

/// Commitments published in one round, in publication order.
#[derive(Debug, Default)]
pub struct CommitmentBook {
    entries: Vec<Entry>,
    index: HashMap<ParticipantId, usize>,
    resolver: ContentResolver,
}

impl CommitmentBook {
    pub fn new(resolver: ContentResolver) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            resolver,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn claims_of(&self, participant: &ParticipantId) -> Option<&CommitmentClaims> {
        self.index.get(participant).map(|&i| &self.entries[i].claims)
    }

    /// Record a participant's published claims. One commitment per participant.
    pub fn publish(
        &mut self,
        participant: ParticipantId,
        claims: CommitmentClaims,
    ) -> Result<(), DigestError> {
        if self.index.contains_key(&participant) {
            return Err(DigestError::DuplicateCommitment(participant));
        }
        if let Some(original) = self.first_publisher_of(&claims.sign_hash) {
            tracing::warn!(
                participant = %participant,
                original = %original,
                "published sign hash duplicates an earlier commitment"
            );
        }
        tracing::debug!(participant = %participant, vote_hash = %claims.vote_hash, "commitment published");
        self.index.insert(participant.clone(), self.entries.len());
        self.entries.push(Entry {
            participant,
            claims,
            revealed: false,
        });
        Ok(())
    }

    fn first_publisher_of(&self, sign_hash: &Hash256) -> Option<&ParticipantId> {
        self.entries
            .iter()
            .find(|e| e.claims.sign_hash == *sign_hash)
            .map(|e| &e.participant)
    }

    /// Groups of participants sharing an identical `sign_hash`, original first.
    pub fn copied_commitments(&self) -> Vec<Vec<ParticipantId>> {
        let mut order: Vec<Hash256> = Vec::new();
        let mut groups: HashMap<Hash256, Vec<ParticipantId>> = HashMap::new();
        for entry in &self.entries {
            let group = groups.entry(entry.claims.sign_hash).or_insert_with(|| {
                order.push(entry.claims.sign_hash);
                Vec::new()
            });
            group.push(entry.participant.clone());
        }
        order
            .into_iter()
            .filter_map(|h| groups.remove(&h))
            .filter(|g| g.len() > 1)
            .collect()
    }

    /// Participants clustered by `vote_hash` in first-seen order.
    ///
    /// Available before any reveal: clusters are the result groups the round
    /// will be resolved over.
    pub fn agreement(&self) -> Vec<(Hash256, Vec<ParticipantId>)> {
        let mut clusters: Vec<(Hash256, Vec<ParticipantId>)> = Vec::new();
        for entry in &self.entries {
            match clusters.iter_mut().find(|(h, _)| *h == entry.claims.vote_hash) {
                Some((_, members)) => members.push(entry.participant.clone()),
                None => clusters.push((entry.claims.vote_hash, vec![entry.participant.clone()])),
            }
        }
        clusters
    }

    /// Verify a participant's reveal and turn it into a vote staking `stake`.
    ///
    /// Errors are protocol violations (unknown participant, second reveal);
    /// a reveal that fails verification or reuses a copied commitment is a
    /// [`RevealOutcome::Rejected`].
    ///
    /// A reveal is final. Content that cannot be read, such as an object
    /// missing from the store, is a `Mismatch`, and the participant cannot
    /// reveal again with other content.
    pub fn reveal(
        &mut self,
        participant: &ParticipantId,
        reveal: &Reveal,
        stake: f64,
    ) -> Result<RevealOutcome, DigestError> {
        let idx = *self
            .index
            .get(participant)
            .ok_or_else(|| DigestError::UnknownParticipant(participant.clone()))?;
        if self.entries[idx].revealed {
            return Err(DigestError::AlreadyRevealed(participant.clone()));
        }
        self.entries[idx].revealed = true;

        let claims = self.entries[idx].claims;
        if let Some(original) = self.first_publisher_of(&claims.sign_hash) {
            if original != participant {
                tracing::warn!(participant = %participant, original = %original, "copied commitment rejected");
                return Ok(RevealOutcome::Rejected {
                    participant: participant.clone(),
                    reason: RejectReason::Copied {
                        original: original.clone(),
                    },
                });
            }
        }

        if !claims.verify(&self.resolver, &reveal.content, &reveal.nonce) {
            tracing::warn!(participant = %participant, "reveal does not match published commitment");
            return Ok(RevealOutcome::Rejected {
                participant: participant.clone(),
                reason: RejectReason::Mismatch,
            });
        }

        Ok(RevealOutcome::Accepted(Vote {
            participant: participant.clone(),
            result: ResultValue::Digest(claims.vote_hash),
            stake,
        }))
    }

    /// Participants that published but have not revealed yet.
    pub fn pending_reveals(&self) -> Vec<&ParticipantId> {
        self.entries
            .iter()
            .filter(|e| !e.revealed)
            .map(|e| &e.participant)
            .collect()
    }
}
