//! Configuration types for static-firewall
//!
//! All configuration structures are defined here and can be
//! serialized/deserialized from JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Accepted values for `log.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Accepted values for `log.format`
pub const LOG_FORMATS: [&str; 2] = ["json", "text"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Rule sources
    #[serde(default)]
    pub rules: RulesConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;
        self.log.validate()?;
        Ok(())
    }

    /// Configuration written by `create_default_config`
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            rules: RulesConfig {
                path: Some(PathBuf::from("/etc/static-firewall/rules.csv")),
                inline: Vec::new(),
            },
            log: LogConfig::default(),
        }
    }
}

/// Where rules are loaded from
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Rule file, one `direction,protocol,ports,address` record per line
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Rule lines given directly in the configuration
    #[serde(default)]
    pub inline: Vec<String>,
}

impl RulesConfig {
    /// Validate rule sources
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if no source is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_none() && self.inline.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one of rules.path or rules.inline must be set".into(),
            ));
        }

        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "rules.path cannot be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Include target (module path)
    #[serde(default = "default_true")]
    pub target: bool,
}

impl LogConfig {
    /// Validate logging configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` for an unknown level or format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Unknown log level: {}",
                self.level
            )));
        }

        if !LOG_FORMATS.contains(&self.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Unknown log format: {} (expected json or text)",
                self.format
            )));
        }

        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: true,
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

const fn default_true() -> bool {
    true
}
