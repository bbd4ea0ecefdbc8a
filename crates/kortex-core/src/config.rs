//! Client configuration management.
//!
//! Persists the backend base URL and client storage location to
//! `~/.kortex/config.json`. Command-line flags override whatever is stored.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Persistent client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KortexConfig {
    /// Backend base URL (differs per deployment target).
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Durable client storage file. Defaults to `~/.kortex/storage.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for KortexConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            storage_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl KortexConfig {
    /// Path to the config directory: `~/.kortex/`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".kortex"))
    }

    /// Path to the config file: `~/.kortex/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    /// Load config from disk. Returns default if file doesn't exist or is invalid.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()
            .ok_or_else(|| Error::Config("Cannot determine home directory".into()))?;
        std::fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join("config.json"), json)?;
        Ok(())
    }

    /// Storage file to use: the configured one, else `~/.kortex/storage.json`.
    pub fn resolved_storage_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage_path {
            return Ok(path.clone());
        }
        Self::config_dir()
            .map(|d| d.join("storage.json"))
            .ok_or_else(|| Error::Config("Cannot determine home directory".into()))
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Replace the base URL after checking it looks like an HTTP(S) URL.
    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API URL must start with http:// or https://, got {url:?}"
            )));
        }
        self.api_url = url.to_string();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let cfg = KortexConfig::default();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert!(cfg.storage_path.is_none());
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: KortexConfig = serde_json::from_str(r#"{"api_url": "https://kortex.example"}"#).unwrap();
        assert_eq!(cfg.api_url, "https://kortex.example");
        assert_eq!(cfg.request_timeout_secs, 10);
    }

    #[test]
    fn storage_path_omitted_when_unset() {
        let json = serde_json::to_string(&KortexConfig::default()).unwrap();
        assert!(!json.contains("storage_path"), "got: {json}");
    }

    #[test]
    fn explicit_storage_path_wins() {
        let cfg = KortexConfig {
            storage_path: Some(PathBuf::from("/tmp/kortex.json")),
            ..Default::default()
        };
        assert_eq!(
            cfg.resolved_storage_path().unwrap(),
            PathBuf::from("/tmp/kortex.json")
        );
    }

    #[test]
    fn set_api_url_strips_trailing_slash() {
        let mut cfg = KortexConfig::default();
        cfg.set_api_url("https://api.kortex.example/").unwrap();
        assert_eq!(cfg.api_url, "https://api.kortex.example");
    }

    #[test]
    fn set_api_url_rejects_non_http() {
        let mut cfg = KortexConfig::default();
        assert!(matches!(cfg.set_api_url("ftp://x"), Err(Error::Config(_))));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
    }
}
