//! Runtime configuration.
//!
//! Where the beacon lives, how long to wait for it, whether to cache details
//! lookups, and the suite to run. Durations are humantime strings (`30s`,
//! `5m`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use beacon_core::{SuiteConfig, SuiteError};

/// Environment variable that overrides `base_url` from the file.
pub const BASE_URL_ENV: &str = "BEACON_BASE_URL";

/// Errors loading runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse config: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid suite: {0}")]
    Suite(#[from] SuiteError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_max_entries() -> u64 {
    10_000
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(600)
}

/// Details cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,

    #[serde(default = "default_cache_ttl", with = "humantime_duration")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_entries: default_cache_max_entries(),
            ttl: default_cache_ttl(),
        }
    }
}

/// Configuration for one validation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Beacon base URL, e.g. `https://kba.ncats.io/beacon/biolink/`.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_request_timeout", with = "humantime_duration")]
    pub request_timeout: Duration,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub suite: SuiteConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: default_request_timeout(),
            cache: CacheConfig::default(),
            suite: SuiteConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse from YAML. The `suite` section goes through suite validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut value: serde_json::Value = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            value = serde_json::json!({});
        }

        let suite = match value.as_object_mut() {
            Some(map) => map.remove("suite").unwrap_or(serde_json::Value::Null),
            None => {
                return Err(ConfigError::Invalid(
                    "config must be a mapping".to_string(),
                ))
            }
        };

        let mut config: RuntimeConfig = serde_json::from_value(value)?;
        config.suite = SuiteConfig::from_value(suite)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Apply `BEACON_BASE_URL` if it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = Some(url);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_entries must be at least 1 when the cache is enabled".to_string(),
            ));
        }

        self.suite.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::SemanticGroup;

    #[test]
    fn test_config_default() {
        let config = RuntimeConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.cache.enabled);
        assert!(config.base_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
base_url: "https://beacon.example.org/api/"
request_timeout: "1m 30s"
cache:
  enabled: false
  ttl: "5m"
suite:
  keywords: "diabetes"
  semantic_groups: [GENE, CHEM]
"#;
        let config = RuntimeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://beacon.example.org/api/"));
        assert_eq!(config.request_timeout, Duration::from_secs(90));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.cache.max_entries, 10_000);
        assert_eq!(config.suite.keywords, "diabetes");
        assert_eq!(
            config.suite.semantic_groups,
            vec![SemanticGroup::Genes, SemanticGroup::Chemicals]
        );
    }

    #[test]
    fn test_empty_config_is_defaults() {
        assert_eq!(RuntimeConfig::from_yaml("{}").unwrap(), RuntimeConfig::default());
    }

    #[test]
    fn test_bad_duration_rejected() {
        let result = RuntimeConfig::from_yaml("request_timeout: soon");
        assert!(matches!(result, Err(ConfigError::JsonError(_))));
    }

    #[test]
    fn test_suite_errors_surface() {
        let result = RuntimeConfig::from_yaml("suite:\n  page_size: 1\n");
        assert!(matches!(result, Err(ConfigError::Suite(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(RuntimeConfig::from_yaml("base_ur: x").is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = RuntimeConfig::from_yaml("request_timeout: 0s");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_base_url_override() {
        let config = RuntimeConfig::default()
            .with_base_url_override(Some("https://a.example/".to_string()))
            .with_base_url_override(Some("  ".to_string()))
            .with_base_url_override(None);
        assert_eq!(config.base_url.as_deref(), Some("https://a.example/"));
    }

    #[test]
    fn test_round_trip_keeps_humantime_strings() {
        let yaml = serde_yaml::to_string(&RuntimeConfig::default()).unwrap();
        assert!(yaml.contains("30s"));
        assert!(yaml.contains("10m"));
    }
}
