//! sarmenta: commit to results, verify reveals and resolve credibility-weighted
//! consensus rounds from the command line.

mod commands;
mod config;

use clap::Parser;
use config::RoundConfig;
use sarmenta_digest::CommitmentClaims;
use sarmenta_settlement::Weighting;
use sarmenta_types::Hash256;
use sarmenta_utils::LogFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sarmenta", about = "Commit-reveal digests and Sarmenta consensus resolution")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "SARMENTA_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum score the winning result must reach, in (0, 1).
    #[arg(long, env = "SARMENTA_CONFIDENCE_TARGET")]
    confidence_target: Option<f64>,

    /// Fixed cost added to the kitty.
    #[arg(long, env = "SARMENTA_ROUND_COST")]
    round_cost: Option<f64>,

    /// Credibility of participants without an explicit value.
    #[arg(long, env = "SARMENTA_DEFAULT_CREDIBILITY")]
    default_credibility: Option<f64>,

    /// Kitty split: "credibility" or "log-odds".
    #[arg(long, env = "SARMENTA_WEIGHTING", value_parser = parse_weighting)]
    weighting: Option<Weighting>,

    /// Nonce length in bytes for new commitments.
    #[arg(long, env = "SARMENTA_NONCE_LEN")]
    nonce_len: Option<usize>,

    /// Directory holding ipfs:// objects.
    #[arg(long, env = "SARMENTA_OBJECT_STORE")]
    object_store: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SARMENTA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SARMENTA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Commit to content given as scheme://value and print the claims and nonce.
    Commit {
        /// raw://<hex>, str://<text>, file://<path> or ipfs://[host[:port]/]<cid>.
        uri: String,
    },
    /// Check a reveal against published claims. Exits 1 when invalid.
    Verify {
        /// The revealed content URI.
        uri: String,
        /// The revealed nonce, hex encoded.
        #[arg(long)]
        nonce: String,
        #[arg(long)]
        vote_hash: Hash256,
        #[arg(long)]
        sign_hash: Hash256,
        #[arg(long)]
        priv_hash: Hash256,
    },
    /// Resolve a JSON array of votes and print the result with its settlement.
    /// Exits 2 when the confidence target is not reached.
    Resolve {
        /// File holding `[{"participant", "result", "stake"}, ...]`.
        votes: PathBuf,
    },
}

fn parse_weighting(s: &str) -> Result<Weighting, String> {
    match s.to_ascii_lowercase().as_str() {
        "credibility" => Ok(Weighting::Credibility),
        "log-odds" | "logodds" => Ok(Weighting::LogOdds),
        other => Err(format!("unknown weighting '{other}' (expected 'credibility' or 'log-odds')")),
    }
}

impl Cli {
    /// Apply flag and env overrides on top of the file (or default) config.
    fn merge_into(&self, base: RoundConfig) -> anyhow::Result<RoundConfig> {
        let config = RoundConfig {
            confidence_target: self.confidence_target.unwrap_or(base.confidence_target),
            round_cost: self.round_cost.unwrap_or(base.round_cost),
            default_credibility: self.default_credibility.unwrap_or(base.default_credibility),
            weighting: self.weighting.unwrap_or(base.weighting),
            nonce_len: self.nonce_len.unwrap_or(base.nonce_len),
            object_store: self.object_store.clone().or(base.object_store),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            log_format: self.log_format.unwrap_or(base.log_format),
            ..base
        };
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => RoundConfig::from_toml_file(path)?,
        None => RoundConfig::default(),
    };
    let config = cli.merge_into(base)?;

    sarmenta_utils::init_logging(config.log_format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Commit { uri } => commands::commit(&config, &uri, &mut out),
        Command::Verify {
            uri,
            nonce,
            vote_hash,
            sign_hash,
            priv_hash,
        } => {
            let claims = CommitmentClaims {
                vote_hash,
                sign_hash,
                priv_hash,
            };
            commands::verify(&config, &uri, &nonce, claims, &mut out)
        }
        Command::Resolve { votes } => commands::resolve(&config, &votes, &mut out),
    }
}
