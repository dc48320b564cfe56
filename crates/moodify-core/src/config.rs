use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote song search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint; queried with `term`, `media`, `entity` and `limit`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Term used when the query box is empty.
    #[serde(default = "default_term")]
    pub default_term: String,
    #[serde(default = "default_media")]
    pub media: String,
    #[serde(default = "default_entity")]
    pub entity: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Quiet period after the last keystroke before a search is issued.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Upper bound on a single search request; expiry counts as a failure.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON snapshot file per key.
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_term: default_term(),
            media: default_media(),
            entity: default_entity(),
            limit: default_limit(),
            debounce_ms: default_debounce_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

fn default_endpoint() -> String {
    "https://itunes.apple.com/search".to_string()
}

fn default_term() -> String {
    "pop".to_string()
}

fn default_media() -> String {
    "music".to_string()
}

fn default_entity() -> String {
    "song".to_string()
}

fn default_limit() -> u32 {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_store_dir() -> PathBuf {
    platform::store_dir()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
