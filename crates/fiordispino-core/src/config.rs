//! Client configuration management.
//!
//! Holds the backend base URL, the origin serving the `/api/auth` session
//! endpoint, the request timeout and the storage backend for the session.
//!
//! Configuration is read from `~/.config/fiordispino/config.json` when it
//! exists, then overridden by environment variables (a `.env` file is
//! honoured).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{FileStorage, KeyringStorage, MemoryStorage, Storage, TokenStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "fiordispino";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend base URL
pub const ENV_API_BASE_URL: &str = "PUBLIC_API_SERVER_BASE_URL";

/// Origin serving the session endpoint
pub const ENV_APP_BASE_URL: &str = "FIORDISPINO_APP_URL";

pub const ENV_TIMEOUT_SECS: &str = "FIORDISPINO_TIMEOUT_SECS";

pub const ENV_STORAGE: &str = "FIORDISPINO_STORAGE";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_APP_BASE_URL: &str = "http://localhost:5173";

/// HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "keyring" => Ok(StorageBackend::Keyring),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub app_base_url: String,
    pub request_timeout_secs: u64,
    pub storage: StorageBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage: StorageBackend::default(),
        }
    }
}

impl Config {
    /// Load from the config file and the environment.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok())?;
        info!(api = %config.api_base_url, app = %config.app_base_url, "Configuration loaded");
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Override fields from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(url) = lookup(ENV_APP_BASE_URL) {
            self.app_base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value: {}", ENV_TIMEOUT_SECS, secs))?;
        }
        if let Some(storage) = lookup(ENV_STORAGE) {
            self.storage = storage.parse()?;
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self.app_base_url = self.app_base_url.trim_end_matches('/').to_string();
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Build the client session store for the configured backend.
    pub fn token_store(&self) -> Result<TokenStore> {
        let storage: Arc<dyn Storage> = match self.storage {
            StorageBackend::File => Arc::new(FileStorage::new(&self.data_dir()?)),
            StorageBackend::Keyring => Arc::new(KeyringStorage::new()),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Ok(TokenStore::new(storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[
                (ENV_API_BASE_URL, "https://api.fiordispino.it/"),
                (ENV_TIMEOUT_SECS, "5"),
                (ENV_STORAGE, "Keyring"),
            ]))
            .unwrap();

        assert_eq!(config.api_base_url, "https://api.fiordispino.it");
        assert_eq!(config.app_base_url, DEFAULT_APP_BASE_URL);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.storage, StorageBackend::Keyring);
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(lookup(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn test_file_fields_default_when_missing() {
        let config: Config = serde_json::from_str(r#"{"api_base_url": "http://backend"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://backend");
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.storage, StorageBackend::File);
    }

    #[test]
    fn test_memory_token_store() {
        let config = Config {
            storage: StorageBackend::Memory,
            ..Config::default()
        };
        let store = config.token_store().unwrap();
        store.set_token("abc");
        assert_eq!(store.token().as_deref(), Some("abc"));
    }
}
