//! Commit → publish → reveal → resolve → settle, with deterministic nonces
//! and an in-memory object store.

use std::sync::Arc;

use sarmenta_consensus::{ConsensusError, ConsensusRound, RoundState};
use sarmenta_digest::{CommitmentBook, Committer, ContentResolver, RejectReason, Reveal, RevealOutcome};
use sarmenta_nullables::{NullCredibility, NullNonceSource, NullObjectStore};
use sarmenta_settlement::{SettleRound, SettlementError, Weighting};
use sarmenta_types::{ParticipantId, ResultValue, Vote};

fn pid(s: &str) -> ParticipantId {
    ParticipantId::new(s).unwrap()
}

struct Harness {
    committer: Committer,
    book: CommitmentBook,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(
            NullObjectStore::new()
                .with_object("QmRight", "A")
                .with_object("QmWrong", "B"),
        );
        Self {
            committer: Committer::new()
                .with_nonce_source(Arc::new(NullNonceSource::counting()))
                .with_resolver(ContentResolver::with_store(store.clone())),
            book: CommitmentBook::new(ContentResolver::with_store(store)),
        }
    }

    /// Commit and publish; returns the reveal to play back later.
    fn publish(&mut self, participant: &str, uri: &str) -> Reveal {
        let commitment = self.committer.commit(uri).unwrap();
        self.book.publish(pid(participant), commitment.claims()).unwrap();
        commitment.reveal()
    }

    fn reveal(&mut self, participant: &str, reveal: &Reveal) -> Option<Vote> {
        match self.book.reveal(&pid(participant), reveal, 1.0).unwrap() {
            RevealOutcome::Accepted(vote) => Some(vote),
            RevealOutcome::Rejected { .. } => None,
        }
    }
}

#[test]
fn four_honest_one_dissenter() {
    let mut h = Harness::new();
    let mut reveals = Vec::new();
    // Inline and stored copies of the same bytes agree.
    for (p, uri) in [
        ("w1", "str://A"),
        ("w2", "ipfs://QmRight"),
        ("w3", "raw://41"),
        ("w4", "str://A"),
        ("w5", "ipfs://QmWrong"),
    ] {
        reveals.push((p, h.publish(p, uri)));
    }
    assert_eq!(h.book.agreement().len(), 2);

    let mut round = ConsensusRound::new(1.0, 0.99).unwrap();
    for (p, reveal) in &reveals {
        let vote = h.reveal(p, reveal).expect("honest reveal accepted");
        round.add_vote(vote).unwrap();
    }

    let model = NullCredibility::new(0.9);
    assert!(round.try_resolve(&model).unwrap());
    assert_eq!(round.state(), RoundState::Resolved);

    let result = round.result().unwrap();
    let a_hash = match &result.winning_result {
        ResultValue::Digest(h) => *h,
        other => panic!("expected digest result, got {other}"),
    };
    assert_eq!(a_hash, h.committer.commit("str://A").unwrap().vote_hash());
    assert!(result.confidence_score > 0.99);

    let table = round.settle().unwrap();
    assert_eq!(table.kitty, 2.0);
    for p in ["w1", "w2", "w3", "w4"] {
        assert!((table.amount_for(&pid(p)).unwrap() - 0.5).abs() < 1e-12);
    }
    assert_eq!(table.amount_for(&pid("w5")), Some(-1.0));
    assert!((table.total_paid_to_winners() - table.kitty).abs() < 1e-12);
}

#[test]
fn copier_and_forger_never_reach_the_round() {
    let mut h = Harness::new();
    let honest = h.publish("honest", "str://A");
    let honest_claims = *h.book.claims_of(&pid("honest")).unwrap();
    h.book.publish(pid("copycat"), honest_claims).unwrap();
    let liar = h.publish("liar", "str://B");

    let mut round = ConsensusRound::new(0.0, 0.5).unwrap();
    round.add_vote(h.reveal("honest", &honest).unwrap()).unwrap();

    match h.book.reveal(&pid("copycat"), &honest, 1.0).unwrap() {
        RevealOutcome::Rejected { reason, .. } => {
            assert_eq!(reason, RejectReason::Copied { original: pid("honest") })
        }
        other => panic!("copy accepted: {other:?}"),
    }

    let forged = Reveal {
        content: "str://A".into(),
        nonce: liar.nonce.clone(),
    };
    assert!(h.reveal("liar", &forged).is_none());
    assert!(h.book.pending_reveals().is_empty());

    assert_eq!(round.len(), 1);
    assert!(round.try_resolve(&NullCredibility::new(0.9)).unwrap());
}

#[test]
fn conflicting_certainty_keeps_round_open_and_unsettled() {
    let mut round = ConsensusRound::new(1.0, 0.9).unwrap();
    round.add_vote(Vote::new(pid("oracle1"), "A", 1.0)).unwrap();
    round.add_vote(Vote::new(pid("oracle2"), "B", 1.0)).unwrap();

    let model = NullCredibility::new(1.0);
    assert!(matches!(
        round.try_resolve(&model),
        Err(ConsensusError::ConflictingCertainty { .. })
    ));
    assert_eq!(round.state(), RoundState::Open);
    assert_eq!(round.settle(), Err(SettlementError::NotResolved));
}

#[test]
fn resolved_round_is_not_rescored() {
    let mut round = ConsensusRound::new(1.0, 0.5).unwrap();
    round.add_vote(Vote::new(pid("a"), 1i64, 2.0)).unwrap();
    round.add_vote(Vote::new(pid("b"), 2i64, 3.0)).unwrap();
    round.add_vote(Vote::new(pid("c"), 1i64, 1.0)).unwrap();

    let model = NullCredibility::new(0.9);
    assert!(round.try_resolve(&model).unwrap());
    let queries = model.queries();
    assert!(round.try_resolve(&model).unwrap());
    assert_eq!(model.queries(), queries);

    let table = round.settle_with(Weighting::LogOdds).unwrap();
    assert_eq!(table.kitty, 4.0);
    assert_eq!(table.amount_for(&pid("b")), Some(-3.0));
    assert!((table.amount_for(&pid("a")).unwrap() - 2.0).abs() < 1e-12);
}
