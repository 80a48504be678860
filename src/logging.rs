//! `tracing` subscriber setup for applications embedding the filter.

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Map a configured level name to a `tracing` level
///
/// Unknown names fall back to `INFO`.
#[must_use]
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install a global fmt subscriber from logging configuration
///
/// `RUST_LOG` directives are honored on top of the configured level.
/// Returns `false` if a global subscriber was already installed.
pub fn init(config: &LogConfig) -> bool {
    let filter = EnvFilter::from_default_env().add_directive(parse_level(&config.level).into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.target);

    let installed = if config.format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    installed.is_ok()
}
