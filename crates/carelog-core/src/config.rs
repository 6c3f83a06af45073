//! Carelog configuration.
//!
//! Loads configuration from ~/.config/carelog/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

// Default configuration constants
pub const MAX_HISTORY_LENGTH: usize = 8000;
pub const HISTORY_NAMESPACE: &str = "ai-history";
pub const DEFAULT_BUCKET: &str = "documents";
const MIN_HISTORY_LENGTH: usize = 64;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarelogConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Rolling transcript settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Transcript cap, in characters
    pub max_length: usize,
    /// Path prefix inside the bucket
    pub namespace: String,
    pub bucket: String,
    /// Serialize concurrent appends for the same subject within this process
    pub serialize_appends: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_length: MAX_HISTORY_LENGTH,
            namespace: HISTORY_NAMESPACE.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            serialize_appends: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Redb,
    Fs,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Redb => "redb",
            StorageBackend::Fs => "fs",
            StorageBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(StorageBackend::Redb),
            "fs" | "file" | "filesystem" => Ok(StorageBackend::Fs),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

/// Blob store selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file (redb) or blob root directory (fs); defaults live in the data dir
    pub path: Option<PathBuf>,
}

impl CarelogConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load configuration from a specific path, falling back to defaults
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                Self::default()
            }
        }
    }

    /// Load configuration from a file that must exist and parse
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("carelog").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.history.max_length < MIN_HISTORY_LENGTH {
            return Err(anyhow::anyhow!(
                "History max_length must be at least {}",
                MIN_HISTORY_LENGTH
            ));
        }

        validate_segment("History namespace", &self.history.namespace)?;
        validate_segment("History bucket", &self.history.bucket)?;

        if self.history.bucket.contains('/') {
            return Err(anyhow::anyhow!("History bucket must not contain '/'"));
        }

        Ok(())
    }
}

fn validate_segment(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("{} must not be empty", label));
    }
    if value.starts_with('/') || value.ends_with('/') {
        return Err(anyhow::anyhow!(
            "{} must not start or end with '/'",
            label
        ));
    }
    Ok(())
}
