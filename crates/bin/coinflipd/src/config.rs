//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `coinflip.toml` in the working directory (or the path in
//! `COINFLIP_CONFIG`). Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use coinflip_adapter_random::RandomBinarySensorConfig;
use coinflip_domain::config_entry::ConfigEntry;

const DEFAULT_PATH: &str = "coinflip.toml";

/// One day; longer periods are almost certainly a typo.
const MAX_POLL_INTERVAL_SECS: u64 = 86_400;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Polling loop settings.
    pub polling: PollingConfig,
    /// Static `[[binary_sensor]]` platform blocks.
    #[serde(rename = "binary_sensor")]
    pub binary_sensors: Vec<BinarySensorPlatform>,
    /// Dynamic `[[config_entries]]`.
    pub config_entries: Vec<ConfigEntry>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// How often the host refreshes entities.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
}

/// One static binary sensor platform, selected by its `platform` key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum BinarySensorPlatform {
    Random(RandomBinarySensorConfig),
}

impl Config {
    /// Load configuration from `COINFLIP_CONFIG` or `coinflip.toml` (if
    /// present), then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("COINFLIP_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("COINFLIP_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(secs) = lookup("COINFLIP_POLL_INTERVAL").and_then(|val| val.parse().ok()) {
            self.polling.interval_secs = secs;
        }
    }

    /// Config entries are not checked here: each one is validated when it
    /// is set up, and a bad entry is skipped without aborting startup.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_POLL_INTERVAL_SECS).contains(&self.polling.interval_secs) {
            return Err(ConfigError::Validation(format!(
                "polling interval must be between 1 and {MAX_POLL_INTERVAL_SECS} seconds, got {}",
                self.polling.interval_secs
            )));
        }
        Ok(())
    }

    /// Time between two polling rounds.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "coinflipd=info,coinflip_app=info,coinflip_adapter_random=info".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
