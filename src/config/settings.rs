/// Configuration structures

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ChainId, RiskThresholds};
use crate::error::ConfigError;
use crate::util::dexscreener::{API_TIMEOUT_SECS, CACHE_DURATION_SECS, DEXSCREENER_API};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub thresholds: RiskThresholds,
    pub logging: Logging,
    pub watch: Watch,
    pub watchlist: Vec<WatchEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEXSCREENER_API.to_string(),
            timeout_secs: API_TIMEOUT_SECS,
            cache_ttl_secs: CACHE_DURATION_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Used when RUST_LOG is not set
    pub level: String,
    pub directory: String,
    pub file_name: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: "logs".to_string(),
            file_name: "sentinel.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Watch {
    pub interval_secs: u64,
    /// How often the config file is checked for edits
    pub reload_interval_secs: u64,
}

impl Default for Watch {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            reload_interval_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WatchEntry {
    pub chain: ChainId,
    pub address: String,
    pub label: Option<String>,
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Missing file means defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn watch_targets(&self) -> Vec<(ChainId, String)> {
        self.watchlist
            .iter()
            .map(|entry| (entry.chain, entry.address.clone()))
            .collect()
    }
}
