//! Load: config loading from file and environment variables.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use super::model::ParserConfig;
use crate::parser::{FormatKind, MAX_LINE_SIZE};

/// Environment variable naming the config file.
pub const CONFIG_FILE_ENV: &str = "LOGLINE_CONFIG_FILE";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/logline/logline.toml";

const FORMAT_ENV: &str = "LOGLINE_FORMAT";
const MAX_LINE_SIZE_ENV: &str = "LOGLINE_MAX_LINE_SIZE";
const METRICS_ENV: &str = "LOGLINE_METRICS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ParserConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            format: lookup(FORMAT_ENV)
                .and_then(|s| s.parse().ok())
                .unwrap_or(FormatKind::Rfc5424),
            max_line_size: lookup(MAX_LINE_SIZE_ENV)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(MAX_LINE_SIZE),
            metrics: lookup(METRICS_ENV)
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        }
    }

    /// Environment variables override file config for the critical settings.
    /// Unparseable values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(format) = lookup(FORMAT_ENV) {
            match format.parse::<FormatKind>() {
                Ok(kind) => self.format = kind,
                Err(e) => warn!("Ignoring {}: {}", FORMAT_ENV, e),
            }
        }
        if let Some(size) = lookup(MAX_LINE_SIZE_ENV) {
            match size.trim().parse::<usize>() {
                Ok(size) => self.max_line_size = size,
                Err(e) => warn!("Ignoring {}={}: {}", MAX_LINE_SIZE_ENV, size, e),
            }
        }
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_size == 0 {
            return Err(ConfigError::Invalid("max_line_size must be > 0".to_string()));
        }
        Ok(())
    }
}

impl FromStr for ParserConfig {
    type Err = ConfigError;

    /// Parse configuration from TOML text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
