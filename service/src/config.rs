//! Service configuration with TOML file support.

use attest_policy::PolicyError;
use attest_types::{Account, PolicyParams, ProviderId, WindowPolicy};
use attest_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config TOML: {0}")]
    Parse(String),

    #[error("cannot serialise config: {0}")]
    Serialize(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Configuration for an [`AttestationService`](crate::AttestationService).
///
/// `owner` is the only required key. Can be loaded from a TOML file via
/// [`ServiceConfig::from_toml_file`] or built programmatically with
/// [`ServiceConfig::new`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Account allowed to change policy parameters.
    pub owner: Account,

    /// Trusted issuer whose signatures are accepted. Defaults to `owner`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Account>,

    /// Days a verification stays valid for point-in-time queries.
    #[serde(default = "default_verify_days")]
    pub verify_day_threshold: u32,

    /// Minimum days between two verifications for one provider.
    #[serde(default = "default_reverify_days")]
    pub reverify_day_threshold: u32,

    /// Maximum distance (seconds) between a proof timestamp and now.
    #[serde(default = "default_proof_max_age_secs")]
    pub proof_max_age_secs: u64,

    /// Providers accepted by `verify_address`.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderId>,

    /// Which verify threshold point-in-time queries apply.
    #[serde(default)]
    pub window_policy: WindowPolicy,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,attest_service=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_verify_days() -> u32 {
    PolicyParams::DEFAULT_VERIFY_DAYS
}

fn default_reverify_days() -> u32 {
    PolicyParams::DEFAULT_REVERIFY_DAYS
}

fn default_proof_max_age_secs() -> u64 {
    3600
}

fn default_providers() -> Vec<ProviderId> {
    vec![ProviderId::github(), ProviderId::proof_of_humanity()]
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Defaults for everything except the owner.
    pub fn new(owner: Account) -> Self {
        Self {
            owner,
            issuer: None,
            verify_day_threshold: default_verify_days(),
            reverify_day_threshold: default_reverify_days(),
            proof_max_age_secs: default_proof_max_age_secs(),
            providers: default_providers(),
            window_policy: WindowPolicy::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// The effective issuer.
    pub fn issuer(&self) -> Account {
        self.issuer.unwrap_or(self.owner)
    }

    pub fn params(&self) -> PolicyParams {
        PolicyParams::new(self.verify_day_threshold, self.reverify_day_threshold)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_zero() {
            return Err(ConfigError::Invalid("owner must not be the zero address".into()));
        }
        if self.issuer().is_zero() {
            return Err(ConfigError::Invalid("issuer must not be the zero address".into()));
        }
        if !self.params().is_valid() {
            return Err(ConfigError::Invalid(format!(
                "day thresholds must be positive (verify={}, reverify={})",
                self.verify_day_threshold, self.reverify_day_threshold
            )));
        }
        if self.proof_max_age_secs == 0 {
            return Err(ConfigError::Invalid("proof_max_age_secs must be positive".into()));
        }
        if self.providers.is_empty() {
            return Err(ConfigError::Invalid("at least one provider is required".into()));
        }
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if !seen.insert(provider) {
                return Err(ConfigError::Invalid(format!("duplicate provider {provider}")));
            }
        }
        Ok(())
    }
}
