//! `nework config show|set`.

use std::path::Path;

use anyhow::Result;
use nework_core::ClientConfig;

use crate::output::{self, Output};

#[derive(Debug, Default)]
pub struct Changes {
    pub server: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<u64>,
    pub data_dir: Option<String>,
}

impl Changes {
    fn is_empty(&self) -> bool {
        self.server.is_none() && self.api_key.is_none() && self.timeout.is_none() && self.data_dir.is_none()
    }

    fn apply(self, config: &mut ClientConfig) {
        if let Some(s) = self.server {
            config.server = s;
        }
        if let Some(k) = self.api_key {
            config.api_key = k;
        }
        if let Some(t) = self.timeout {
            config.timeout_secs = t;
        }
        if let Some(d) = self.data_dir {
            config.data_dir = d;
        }
    }
}

fn masked(key: &str) -> String {
    if key.is_empty() {
        return "-".to_string();
    }
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{}", tail)
}

/// Config as printed: the API key is never shown in full.
fn for_display(mut config: ClientConfig) -> ClientConfig {
    if !config.api_key.is_empty() {
        config.api_key = masked(&config.api_key);
    }
    config
}

/// Print the effective configuration (file plus environment overrides).
pub fn show(path: &Path, out: Output) -> Result<()> {
    let config = for_display(ClientConfig::load(path)?.with_env_overrides());
    if out.is_json() {
        return output::json(&config);
    }
    println!("Config:   {}", path.display());
    println!("Server:   {}", config.server);
    println!("API key:  {}", if config.api_key.is_empty() { "-" } else { &config.api_key });
    println!("Timeout:  {}s", config.timeout_secs);
    println!("Session:  {}", config.resolve_db_path().display());
    Ok(())
}

pub fn set(path: &Path, changes: Changes) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("Nothing to change. Pass --server, --api-key, --timeout or --data-dir.");
    }
    if changes.timeout == Some(0) {
        anyhow::bail!("Timeout must be at least one second.");
    }
    let mut config = ClientConfig::load(path)?;
    changes.apply(&mut config);
    config.save(path)?;
    println!("Config saved to {}.", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_updates_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set(
            &path,
            Changes {
                api_key: Some("secret-key".into()),
                ..Default::default()
            },
        )
        .unwrap();
        set(
            &path,
            Changes {
                timeout: Some(10),
                ..Default::default()
            },
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.api_key, "secret-key");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.server, nework_core::config::DEFAULT_SERVER);
    }

    #[test]
    fn set_rejects_empty_and_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set(&path, Changes::default()).is_err());
        assert!(set(
            &path,
            Changes {
                timeout: Some(0),
                ..Default::default()
            }
        )
        .is_err());
        assert!(!path.exists());
    }

    #[test]
    fn key_is_masked() {
        assert_eq!(masked(""), "-");
        assert_eq!(masked("abcdef123"), "****f123");
        assert_eq!(masked("ab"), "****ab");
    }

    #[test]
    fn displayed_config_hides_key() {
        let config = ClientConfig {
            api_key: "abcdef123".into(),
            ..Default::default()
        };
        let shown = serde_json::to_value(for_display(config)).unwrap();
        assert_eq!(shown["api_key"], "****f123");

        let shown = serde_json::to_value(for_display(ClientConfig::default())).unwrap();
        assert!(shown.get("api_key").is_none());
    }
}
