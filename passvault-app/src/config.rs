//! Application configuration (TOML).
//!
//! ```toml
//! seed_sample_data = true
//!
//! [storage]
//! backend = "http"
//! base_url = "https://vault.example.com"
//! timeout_secs = 15
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use passvault_core::error::{CoreError, CoreResult};

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local, nothing survives a restart
    #[default]
    Memory,
    /// Local JSON file (`JsonFileStore`)
    File,
    /// Remote key-value endpoint (`HttpKeyValueStore`)
    Http,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// File path for the `file` backend
    pub path: PathBuf,
    /// Base url for the `http` backend (`{base_url}/api/storage`)
    pub base_url: Option<String>,
    /// Request timeout for the `http` backend
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("passvault.json"),
            base_url: None,
            timeout_secs: 30,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    /// Write the sample tree on first login
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            seed_sample_data: true,
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> CoreResult<Self> {
        toml::from_str(text)
            .map_err(|e| CoreError::ValidationError(format!("Invalid configuration: {e}")))
    }

    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            log::info!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::StorageError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)?;
        log::info!(
            "Loaded config from {} (backend: {:?})",
            path.display(),
            config.storage.backend
        );
        Ok(config)
    }
}
