//! Client configuration loaded from `~/.config/aida/config.toml`.
//!
//! ```toml
//! [erp]
//! base_url = "https://erp.example.com"
//! api_key = "..."
//! api_secret = "..."
//!
//! [chat]
//! timeout_secs = 30
//! max_attempts = 3
//! base_delay_ms = 1000
//! backoff = "linear"
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use aida_core::error::{AidaError, Result};
use aida_core::retry::{
    Backoff, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, RetryPolicy,
};
use serde::{Deserialize, Serialize};

use crate::paths::AidaPaths;

pub const ENV_ERP_URL: &str = "AIDA_ERP_URL";
pub const ENV_API_KEY: &str = "AIDA_API_KEY";
pub const ENV_API_SECRET: &str = "AIDA_API_SECRET";

/// Connection to the host ERP site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErpConfig {
    /// Origin of the ERP site; RPC calls go to `<base_url>/api/method/...`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Upper bound for calls other than chat (lead creation can be slow).
    pub request_timeout_secs: u64,
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: None,
            api_secret: None,
            request_timeout_secs: 120,
        }
    }
}

/// Chat call budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub backoff: Backoff,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            backoff: Backoff::Linear,
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
            backoff: self.backoff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub erp: ErpConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Applies overrides from a variable lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_ERP_URL).filter(|v| !v.trim().is_empty()) {
            self.erp.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.erp.api_key = Some(key);
        }
        if let Some(secret) = lookup(ENV_API_SECRET).filter(|v| !v.trim().is_empty()) {
            self.erp.api_secret = Some(secret);
        }
    }
}

/// Loads the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default location (`~/.config/aida/config.toml`).
    pub fn new() -> Result<Self> {
        let path = AidaPaths::config_file().map_err(|e| AidaError::config(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file (defaults when it does not exist) and applies
    /// environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = self.load_file()?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Reads the file only.
    pub fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {}", self.path.display());
        Ok(config)
    }

    /// Writes the configuration, creating the parent directory if needed.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.load_file().expect("defaults should load");
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.chat.timeout(), Duration::from_secs(30));
        assert_eq!(config.chat.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[erp]
base_url = "https://erp.example.com"

[chat]
backoff = "exponential"
"#,
        )
        .unwrap();

        let config = ConfigService::with_path(&path).load_file().unwrap();
        assert_eq!(config.erp.base_url, "https://erp.example.com");
        assert_eq!(config.erp.request_timeout_secs, 120);
        assert_eq!(config.chat.backoff, Backoff::Exponential);
        assert_eq!(config.chat.max_attempts, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_toml_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[erp\nbase_url = ").unwrap();

        let err = ConfigService::with_path(&path).load_file().unwrap_err();
        assert!(matches!(err, AidaError::Serialization { .. }));
    }

    #[test]
    fn save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("nested").join("config.toml"));
        let mut config = ClientConfig::default();
        config.erp.api_key = Some("key".to_string());

        service.save(&config).unwrap();
        assert_eq!(service.load_file().unwrap(), config);
    }

    #[test]
    fn overrides_replace_non_empty_values() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|name| match name {
            ENV_ERP_URL => Some("https://override.example.com".to_string()),
            ENV_API_KEY => Some("  ".to_string()),
            ENV_API_SECRET => Some("secret".to_string()),
            _ => None,
        });

        assert_eq!(config.erp.base_url, "https://override.example.com");
        assert_eq!(config.erp.api_key, None);
        assert_eq!(config.erp.api_secret.as_deref(), Some("secret"));
    }
}
