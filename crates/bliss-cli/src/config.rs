//! `config.toml` in the data directory. Every field is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bliss_core::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH};
use bliss_store::DEFAULT_PREFIX;
use serde::{Deserialize, Serialize};

use crate::fetcher::{DEFAULT_API_URL, FetchOptions};
use crate::library::ResourceLocation;

pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BLISS_DATA_DIR";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serve from the passage collection before asking the API.
    pub prefer_local: bool,
    /// Never touch the network.
    pub offline: bool,
    /// File path or `http(s)://` URL of a passage document. Bundled when unset.
    pub collection: Option<String>,
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub min_length: u32,
    pub max_length: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub prefix: String,
    /// Total bytes the store may hold. Unlimited when unset.
    pub quota_bytes: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefer_local: true,
            offline: false,
            collection: None,
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            quota_bytes: None,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid configuration")
    }

    /// Read `<base>/config.toml`, or defaults when the file does not exist.
    pub fn load(base: &Path) -> Result<Self> {
        let path = base.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn collection_location(&self) -> ResourceLocation {
        match self.collection.as_deref().map(str::trim) {
            Some(loc) if !loc.is_empty() => ResourceLocation::parse(loc),
            _ => ResourceLocation::Bundled,
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            min_length: self.api.min_length,
            max_length: self.api.max_length,
        }
    }
}

/// `$BLISS_DATA_DIR`, else `$HOME/.holy-bliss`.
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(bliss_store::default_base_dir)
}
