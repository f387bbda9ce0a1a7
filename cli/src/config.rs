//! Round configuration with TOML file support.

use anyhow::{bail, Context};
use sarmenta_credibility::{Clamped, Credibility, CredibilityModel, HistoryCredibility, TableCredibility};
use sarmenta_digest::{ContentResolver, DirectoryObjectStore};
use sarmenta_settlement::Weighting;
use sarmenta_types::nonce::DEFAULT_NONCE_LEN;
use sarmenta_types::ParticipantId;
use sarmenta_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration for committing, verifying and resolving rounds.
///
/// Loaded from a TOML file via [`RoundConfig::from_toml_file`]; every field
/// has a default so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Minimum score the winning result must reach.
    #[serde(default = "default_confidence_target")]
    pub confidence_target: f64,

    /// Fixed amount added to the kitty.
    #[serde(default = "default_round_cost")]
    pub round_cost: f64,

    /// Credibility of participants absent from `credibility` and `validated`.
    #[serde(default = "default_credibility")]
    pub default_credibility: f64,

    /// Per-participant credibility overrides.
    #[serde(default)]
    pub credibility: BTreeMap<String, f64>,

    /// Assumed fraction of faulty participants. When set, credibility comes
    /// from validated-result counts instead of the table.
    #[serde(default)]
    pub faulty_fraction: Option<f64>,

    /// Previously validated results per participant.
    #[serde(default)]
    pub validated: BTreeMap<String, u64>,

    /// Every credibility is clamped into `[eps, 1 - eps]`.
    #[serde(default = "default_clamp_epsilon")]
    pub clamp_epsilon: f64,

    /// How winners split the kitty.
    #[serde(default)]
    pub weighting: Weighting,

    /// Nonce length in bytes for new commitments.
    #[serde(default = "default_nonce_len")]
    pub nonce_len: usize,

    /// Directory holding `ipfs://` objects, one file per object path.
    #[serde(default)]
    pub object_store: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_confidence_target() -> f64 {
    0.999
}

fn default_round_cost() -> f64 {
    1.0
}

fn default_credibility() -> f64 {
    0.8
}

fn default_clamp_epsilon() -> f64 {
    sarmenta_credibility::DEFAULT_EPSILON
}

fn default_nonce_len() -> usize {
    DEFAULT_NONCE_LEN
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RoundConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that would otherwise only fail deep inside a command.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.confidence_target > 0.0 && self.confidence_target < 1.0) {
            bail!("confidence_target {} must lie in (0, 1)", self.confidence_target);
        }
        if !(self.round_cost.is_finite() && self.round_cost >= 0.0) {
            bail!("round_cost {} must be finite and non-negative", self.round_cost);
        }
        if self.nonce_len == 0 {
            bail!("nonce_len must be at least 1");
        }
        Credibility::new(self.default_credibility).context("default_credibility")?;
        for (participant, value) in &self.credibility {
            Credibility::new(*value).with_context(|| format!("credibility of {participant}"))?;
        }
        Ok(())
    }

    /// Content resolver backed by the configured object store, if any.
    pub fn resolver(&self) -> ContentResolver {
        match &self.object_store {
            Some(dir) => ContentResolver::with_store(Arc::new(DirectoryObjectStore::new(dir))),
            None => ContentResolver::new(),
        }
    }

    /// The credibility model described by this configuration, clamped by
    /// `clamp_epsilon`.
    pub fn credibility_model(&self) -> anyhow::Result<Box<dyn CredibilityModel>> {
        if let Some(fraction) = self.faulty_fraction {
            let mut history = HistoryCredibility::new(fraction)?;
            for (participant, count) in &self.validated {
                history.set_validated(ParticipantId::new(participant.as_str())?, *count);
            }
            return Ok(Box::new(Clamped::new(history, self.clamp_epsilon)?));
        }

        let mut table = TableCredibility::new(Credibility::new(self.default_credibility)?);
        for (participant, value) in &self.credibility {
            table.insert(ParticipantId::new(participant.as_str())?, Credibility::new(*value)?);
        }
        Ok(Box::new(Clamped::new(table, self.clamp_epsilon)?))
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            confidence_target: default_confidence_target(),
            round_cost: default_round_cost(),
            default_credibility: default_credibility(),
            credibility: BTreeMap::new(),
            faulty_fraction: None,
            validated: BTreeMap::new(),
            clamp_epsilon: default_clamp_epsilon(),
            weighting: Weighting::default(),
            nonce_len: default_nonce_len(),
            object_store: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarmenta_types::Vote;

    fn vote(p: &str) -> Vote {
        Vote::new(ParticipantId::new(p).unwrap(), "A", 1.0)
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = RoundConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = RoundConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = RoundConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.confidence_target, 0.999);
        assert_eq!(config.round_cost, 1.0);
        assert_eq!(config.nonce_len, 32);
        assert_eq!(config.weighting, Weighting::Credibility);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            confidence_target = 0.99
            weighting = "log-odds"
            log_format = "json"

            [credibility]
            alice = 0.95
        "#;
        let config = RoundConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.confidence_target, 0.99);
        assert_eq!(config.weighting, Weighting::LogOdds);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.credibility.get("alice"), Some(&0.95));
        assert_eq!(config.round_cost, 1.0);
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert!(RoundConfig::from_toml_str("confidence_target = 1.0").is_err());
        assert!(RoundConfig::from_toml_str("round_cost = -1.0").is_err());
        assert!(RoundConfig::from_toml_str("nonce_len = 0").is_err());
        assert!(RoundConfig::from_toml_str("default_credibility = 1.0").is_err());
        assert!(RoundConfig::from_toml_str("[credibility]\nbob = 0.0").is_err());
    }

    #[test]
    fn missing_file_is_error() {
        assert!(RoundConfig::from_toml_file(Path::new("/nonexistent/sarmenta.toml")).is_err());
    }

    #[test]
    fn table_model_uses_overrides_and_default() {
        let mut config = RoundConfig::default();
        config.credibility.insert("alice".into(), 0.95);
        let model = config.credibility_model().unwrap();
        assert_eq!(model.credibility(&vote("alice")), 0.95);
        assert_eq!(model.credibility(&vote("bob")), 0.8);
    }

    #[test]
    fn history_model_uses_validated_counts() {
        let config = RoundConfig::from_toml_str(
            r#"
            faulty_fraction = 0.2

            [validated]
            veteran = 9
            "#,
        )
        .unwrap();
        let model = config.credibility_model().unwrap();
        // 1 - 0.2 / 10
        assert!((model.credibility(&vote("veteran")) - 0.98).abs() < 1e-12);
        // 1 - 0.2 / 1
        assert!((model.credibility(&vote("newcomer")) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn resolver_has_store_only_when_configured() {
        assert!(!RoundConfig::default().resolver().has_store());
        let config = RoundConfig {
            object_store: Some(PathBuf::from("/tmp")),
            ..Default::default()
        };
        assert!(config.resolver().has_store());
    }
}
