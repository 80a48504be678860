//! Configuration loading and management
//!
//! This module handles loading configuration from files and environment variables.

use std::path::Path;

use tracing::{debug, info};

use super::types::{Config, LOG_FORMATS, LOG_LEVELS};
use crate::error::ConfigError;

/// Load configuration from a JSON file
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    debug!("Loading configuration from {:?}", path);

    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path)?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::ParseError(format!("Failed to parse JSON: {e} at {path:?}"))
    })?;

    config.validate()?;

    info!(
        "Configuration loaded: rules path={:?}, {} inline rules",
        config.rules.path,
        config.rules.inline.len()
    );

    Ok(config)
}

/// Load configuration from a JSON string
///
/// # Errors
///
/// Returns `ConfigError` if parsing or validation fails.
pub fn load_config_str(json: &str) -> Result<Config, ConfigError> {
    let config: Config =
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.validate()?;

    Ok(config)
}

/// Load configuration with environment variable overrides
///
/// Environment variables:
/// - `STATIC_FIREWALL_RULES_PATH`: Override the rule file path
/// - `STATIC_FIREWALL_LOG_LEVEL`: Override log level
/// - `STATIC_FIREWALL_LOG_FORMAT`: Override log format (json or text)
///
/// # Errors
///
/// Returns `ConfigError` if loading or parsing fails, and
/// `ConfigError::EnvError` if an override variable holds an invalid value.
pub fn load_config_with_env(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let mut config = load_config(path)?;
    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    if let Ok(rules_path) = std::env::var("STATIC_FIREWALL_RULES_PATH") {
        if rules_path.trim().is_empty() {
            return Err(ConfigError::EnvError {
                name: "STATIC_FIREWALL_RULES_PATH".into(),
                reason: "path cannot be empty".into(),
            });
        }
        config.rules.path = Some(rules_path.into());
        debug!("Rules path overridden to {:?}", config.rules.path);
    }

    if let Ok(level) = std::env::var("STATIC_FIREWALL_LOG_LEVEL") {
        if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            return Err(ConfigError::EnvError {
                name: "STATIC_FIREWALL_LOG_LEVEL".into(),
                reason: format!("Invalid log level: {level}"),
            });
        }
        config.log.level = level;
        debug!("Log level overridden to {}", config.log.level);
    }

    if let Ok(format) = std::env::var("STATIC_FIREWALL_LOG_FORMAT") {
        if !LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::EnvError {
                name: "STATIC_FIREWALL_LOG_FORMAT".into(),
                reason: format!("Invalid log format: {format}"),
            });
        }
        config.log.format = format;
        debug!("Log format overridden to {}", config.log.format);
    }

    // Re-validate after overrides
    config.validate()
}

/// Create a default configuration file at the given path
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be written.
pub fn create_default_config(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let config = Config::default_config();
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {e}")))?;

    std::fs::write(path, json)?;
    Ok(())
}
