//! Kit configuration with TOML file support.

use serde::{Deserialize, Serialize};

use dashkit_types::NetworkId;
use dashkit_utils::{init_logging, LogFormat};

use crate::KitError;

/// Configuration for a [`Kit`](crate::Kit).
///
/// Chain constants (DGW parameters, magic, ports, protocol version) come
/// from [`NetworkId::params`], not from here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitConfig {
    /// Which network to follow.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Blocks an output needs on top of it before it is spendable.
    #[serde(default = "default_confirmations_threshold")]
    pub confirmations_threshold: u32,

    /// Number of peers the underlying engine keeps connected.
    #[serde(default = "default_peer_size")]
    pub peer_size: usize,

    /// Height of the first header in the store. Blocks within one DGW
    /// window of it are accepted without their full ancestry.
    #[serde(default)]
    pub first_checkpoint_height: u32,

    /// Seconds before an unanswered `getmnlistd` is abandoned.
    #[serde(default = "default_diff_request_timeout_secs")]
    pub diff_request_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,dashkit_masternode_list=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Identifies the wallet's data set to the host application.
    #[serde(default = "default_wallet_id")]
    pub wallet_id: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::MainNet
}

fn default_confirmations_threshold() -> u32 {
    6
}

fn default_peer_size() -> usize {
    10
}

fn default_diff_request_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_wallet_id() -> String {
    "default".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl KitConfig {
    pub fn new(network: NetworkId, wallet_id: impl Into<String>) -> Self {
        Self {
            network,
            wallet_id: wallet_id.into(),
            ..Self::default()
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, KitError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| KitError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, KitError> {
        let config: Self = toml::from_str(s).map_err(|e| KitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, KitError> {
        toml::to_string_pretty(self).map_err(|e| KitError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), KitError> {
        if self.confirmations_threshold == 0 {
            return Err(KitError::Config(
                "confirmations_threshold must be at least 1".into(),
            ));
        }
        if self.peer_size == 0 {
            return Err(KitError::Config("peer_size must be at least 1".into()));
        }
        if self.diff_request_timeout_secs == 0 {
            return Err(KitError::Config(
                "diff_request_timeout_secs must be positive".into(),
            ));
        }
        if self.wallet_id.trim().is_empty() {
            return Err(KitError::Config("wallet_id must not be empty".into()));
        }
        Ok(())
    }

    /// Install the global tracing subscriber described by this config.
    /// Returns `false` if one was already installed.
    pub fn init_logging(&self) -> bool {
        init_logging(self.log_format, &self.log_level)
    }
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            confirmations_threshold: default_confirmations_threshold(),
            peer_size: default_peer_size(),
            first_checkpoint_height: 0,
            diff_request_timeout_secs: default_diff_request_timeout_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            wallet_id: default_wallet_id(),
        }
    }
}
