//! Subcommand implementations. Each writes its report to `out` and returns
//! the process exit code.

use crate::config::RoundConfig;
use anyhow::Context;
use sarmenta_consensus::{ConsensusResult, ConsensusRound, ScoreTable};
use sarmenta_digest::{CommitmentClaims, Committer};
use sarmenta_settlement::{settle_with, TransactionTable};
use sarmenta_types::{Hash256, Nonce, Vote};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

/// Exit code when `resolve` finishes without reaching the confidence target.
pub const EXIT_UNRESOLVED: u8 = 2;

#[derive(Serialize)]
struct CommitReport<'a> {
    uri: String,
    resource_type: &'a str,
    vote_hash: Hash256,
    sign_hash: Hash256,
    priv_hash: Hash256,
    nonce: String,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ResolveReport<'a> {
    Resolved {
        result: &'a ConsensusResult,
        settlement: TransactionTable,
    },
    Unresolved {
        confidence_target: f64,
        votes: usize,
        scores: ScoreTable,
    },
}

/// Commit to `uri` with a fresh nonce and print the claims plus the secret nonce.
pub fn commit(config: &RoundConfig, uri: &str, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let committer = Committer::new()
        .with_nonce_len(config.nonce_len)
        .with_resolver(config.resolver());
    let commitment = committer.commit(uri)?;
    let report = CommitReport {
        uri: commitment.content().to_string(),
        resource_type: commitment.resource_type().as_str(),
        vote_hash: commitment.vote_hash(),
        sign_hash: commitment.sign_hash(),
        priv_hash: commitment.priv_hash(),
        nonce: commitment.nonce().to_hex(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(ExitCode::SUCCESS)
}

/// Check a reveal against published claims. Prints `valid` or `invalid`.
pub fn verify(
    config: &RoundConfig,
    uri: &str,
    nonce_hex: &str,
    claims: CommitmentClaims,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let nonce = Nonce::from_hex(nonce_hex).context("invalid nonce")?;
    let committer = Committer::new().with_resolver(config.resolver());
    if committer.verify(&claims, uri, &nonce) {
        writeln!(out, "valid")?;
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(uri, "reveal does not match the supplied claims");
        writeln!(out, "invalid")?;
        Ok(ExitCode::FAILURE)
    }
}

/// Resolve the votes in a JSON file and print the result with its settlement,
/// or the score table if the confidence target is not met.
pub fn resolve(config: &RoundConfig, votes_path: &Path, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let content = std::fs::read_to_string(votes_path)
        .with_context(|| format!("failed to read votes file {}", votes_path.display()))?;
    let votes: Vec<Vote> = serde_json::from_str(&content)
        .with_context(|| format!("invalid votes file {}", votes_path.display()))?;

    let mut round = ConsensusRound::new(config.round_cost, config.confidence_target)?;
    for vote in votes {
        round.add_vote(vote)?;
    }

    let model = config.credibility_model()?;
    let resolved = round.try_resolve(model.as_ref())?;

    match round.result() {
        Some(result) if resolved => {
            let settlement = settle_with(result, round.votes(), config.weighting)?;
            let report = ResolveReport::Resolved { result, settlement };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            let report = ResolveReport::Unresolved {
                confidence_target: config.confidence_target,
                votes: round.len(),
                scores: round.scores(model.as_ref())?,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            Ok(ExitCode::from(EXIT_UNRESOLVED))
        }
    }
}
