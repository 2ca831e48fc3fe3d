//! Client-side configuration.
//!
//! Reads/writes `~/.nework/config.toml`. Environment variables
//! `NEWORK_SERVER` and `NEWORK_API_KEY` override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SERVER: &str = "http://94.228.125.136:8080/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config write: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Connection and storage settings for one client installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL.
    #[serde(default = "default_server")]
    pub server: String,

    /// Static key sent as `Api-Key` on every request.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Connect/read/write timeout applied by the HTTP transport.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Where the session database lives. Empty means `~/.nework`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data_dir: String,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: String::new(),
        }
    }
}

impl ClientConfig {
    /// Default config file path: ~/.nework/config.toml.
    pub fn default_path() -> PathBuf {
        home_dir().join("config.toml")
    }

    /// Load config from disk, or return the default if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply `NEWORK_SERVER` / `NEWORK_API_KEY` if set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("NEWORK_SERVER").ok(),
            std::env::var("NEWORK_API_KEY").ok(),
        )
    }

    fn with_overrides(mut self, server: Option<String>, api_key: Option<String>) -> Self {
        if let Some(server) = server.filter(|s| !s.is_empty()) {
            self.server = server;
        }
        if let Some(key) = api_key.filter(|s| !s.is_empty()) {
            self.api_key = key;
        }
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.server.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if self.data_dir.is_empty() {
            home_dir()
        } else {
            PathBuf::from(&self.data_dir)
        }
    }

    /// Session database: `{data_dir}/nework.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.resolve_data_dir().join("nework.redb")
    }
}

/// Return the NeWork config directory (~/.nework).
fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".nework")
}
