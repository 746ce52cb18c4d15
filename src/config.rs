//! Configuration Management
//!
//! API connection settings for the Zabbix client.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// JSON-RPC entry point appended to the frontend URL
const API_PATH: &str = "api_jsonrpc.php";

fn default_timeout_secs() -> u64 {
    30
}

/// Zabbix API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Frontend URL, with or without the trailing `api_jsonrpc.php`
    #[serde(default)]
    pub url: String,
    /// API token sent as a bearer credential
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("zabbix-lld").join("config.json"))
    }

    /// Load configuration from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) if path.exists() => Self::read_file(&path)?,
            _ => Self::default(),
        };

        Ok(config.with_env_overrides())
    }

    /// Load configuration from an explicit file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self::read_file(path)?.with_env_overrides())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// `ZABBIX_URL` and `ZABBIX_API_TOKEN` take precedence over file values
    fn with_env_overrides(mut self) -> Self {
        if let Some(url) = non_empty_env("ZABBIX_URL") {
            self.url = url;
        }
        if let Some(token) = non_empty_env("ZABBIX_API_TOKEN") {
            self.token = Some(token);
        }
        self
    }

    /// Resolve the JSON-RPC endpoint URL
    pub fn endpoint(&self) -> Result<Url> {
        if self.url.trim().is_empty() {
            return Err(anyhow::anyhow!("Zabbix URL is not configured"));
        }

        let mut url = Url::parse(self.url.trim())
            .with_context(|| format!("Invalid Zabbix URL '{}'", self.url))?;

        if !url.path().ends_with(API_PATH) {
            let path = format!("{}/{}", url.path().trim_end_matches('/'), API_PATH);
            url.set_path(&path);
        }

        Ok(url)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_endpoint_appends_api_path() {
        let config = ApiConfig {
            url: "http://localhost/zabbix/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://localhost/zabbix/api_jsonrpc.php"
        );
    }

    #[test]
    fn test_endpoint_keeps_explicit_api_path() {
        let config = ApiConfig {
            url: "https://monitor.example.com/api_jsonrpc.php".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://monitor.example.com/api_jsonrpc.php"
        );
    }

    #[test]
    fn test_endpoint_requires_url() {
        assert!(ApiConfig::default().endpoint().is_err());
    }

    #[test]
    fn test_read_file_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"url": "http://zbx.local", "token": "abc123"}}"#).unwrap();

        let config = ApiConfig::read_file(file.path()).unwrap();
        assert_eq!(config.url, "http://zbx.local");
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_read_file_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(ApiConfig::read_file(file.path()).is_err());
    }
}
