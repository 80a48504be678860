//! Configuration module for static-firewall
//!
//! This module provides configuration types and loading utilities.
//!
//! # Example
//!
//! ```no_run
//! use static_firewall::config::load_config;
//! use static_firewall::rules::RuleStore;
//!
//! let config = load_config("/etc/static-firewall/config.json").unwrap();
//! let store = RuleStore::from_config(&config.rules).unwrap();
//! println!("Loaded {} rules", store.record_count());
//! ```

mod loader;
mod types;

pub use loader::{create_default_config, load_config, load_config_str, load_config_with_env};
pub use types::{Config, LogConfig, RulesConfig, LOG_FORMATS, LOG_LEVELS};
