//! Configuration management for stockdesk
//!
//! This module handles loading, validation, and management of
//! stockdesk configuration from YAML files.

pub mod error;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::ConfigError;

/// Environment variable overriding `api.base_url`
pub const ENV_API_URL: &str = "STOCKDESK_API_URL";
/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "STOCKDESK_LOG";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ==================== Configuration Types ====================

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the inventory REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// List view behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Quiescence window for filter input, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    1000
}

/// Table rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// chrono format string used for dates in tables
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Show the linked item next to each transaction
    #[serde(default = "default_true")]
    pub show_item_detail: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            show_item_detail: true,
        }
    }
}

fn default_date_format() -> String {
    "%B %-d, %Y at %-I %p".to_string()
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// List view settings
    #[serde(default)]
    pub list: ListConfig,
    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError {
            path: path.display().to_string(),
        })?;

        Self::from_yaml(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound { path }) => {
                log::debug!("No config file at {}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| {
            ConfigError::InvalidYaml {
                message: e.to_string(),
            }
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Apply overrides from the environment (see [`ENV_API_URL`], [`ENV_LOG_LEVEL`])
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup, then re-validate
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.logging.level = level.to_lowercase();
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.list.debounce_ms > 60_000 {
            return Err(ConfigError::InvalidValue {
                field: "list.debounce_ms".to_string(),
                reason: "Debounce window must be at most 60000 ms".to_string(),
            });
        }

        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidValue {
                field: "display.date_format".to_string(),
                reason: format!("Unsupported date format: {}", self.display.date_format),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.list.debounce_ms)
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    PathBuf::from("stockdesk.yaml")
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rejected_field(yaml: &str) -> String {
        match Config::from_yaml(yaml) {
            Err(ConfigError::InvalidValue { field, .. }) => field,
            other => panic!("expected InvalidValue, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url(), "http://localhost:3000");
        assert_eq!(config.debounce(), Duration::from_millis(1000));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bundled_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.list.debounce_ms, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "api:\n  base_url: \"https://shop.example.com/\"\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url(), "https://shop.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.display.show_item_detail);
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let field = rejected_field("api:\n  base_url: \"localhost:3000\"\n");
        assert_eq!(field, "api.base_url");
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert_eq!(rejected_field("api:\n  timeout_secs: 0\n"), "api.timeout_secs");
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert_eq!(rejected_field("logging:\n  level: loud\n"), "logging.level");
    }

    #[test]
    fn test_rejects_unknown_date_specifier() {
        let field = rejected_field("display:\n  date_format: \"%B %Q\"\n");
        assert_eq!(field, "display.date_format");

        let config = Config::from_yaml("display:\n  date_format: \"%d/%m/%Y %H:%M\"\n").unwrap();
        assert_eq!(config.display.date_format, "%d/%m/%Y %H:%M");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("api: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(|key| match key {
                ENV_API_URL => Some("http://10.0.0.2:8080".to_string()),
                ENV_LOG_LEVEL => Some("DEBUG".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.base_url(), "http://10.0.0.2:8080");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let result = Config::default().with_overrides(|key| {
            (key == ENV_API_URL).then(|| "ftp://example.com".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "list:\n  debounce_ms: 250").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        assert!(matches!(Config::load(&path), Err(ConfigError::FileNotFound { .. })));
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.base_url(), "http://localhost:3000");
    }
}
