//! static-firewall: load-once packet filter
//!
//! This crate decides whether a packet, described by direction, protocol,
//! port and IPv4 address, is permitted by a static rule set.
//!
//! # Features
//!
//! - **Bucketed Index**: rules are split by (direction, protocol) and keyed by port
//! - **Port Ranges**: expanded at load time for constant-time lookups
//! - **Address Ranges**: inclusive ranges compared on packed 32-bit values
//! - **Default Deny**: any packet without a matching rule is rejected
//! - **Fail-Fast Loading**: one bad rule line rejects the whole rule set
//!
//! # Architecture
//!
//! ```text
//! rules.csv → RuleStore (parse, expand, index) → PacketClassifier → accept / deny
//! ```
//!
//! # Quick Start
//!
//! ```
//! use static_firewall::{PacketClassifier, RuleStore};
//!
//! # fn example() -> Result<(), static_firewall::FilterError> {
//! let store = RuleStore::from_lines([
//!     "inbound,tcp,80,192.168.1.2",
//!     "outbound,udp,1000-2000,52.12.48.92",
//! ])?;
//!
//! let classifier = PacketClassifier::new(&store);
//! assert!(classifier.accept("inbound", "tcp", 80, "192.168.1.2")?);
//! assert!(classifier.accept("outbound", "udp", 1500, "52.12.48.92")?);
//! assert!(!classifier.accept("outbound", "tcp", 1500, "52.12.48.92")?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration types and loading
//! - [`error`]: Error types
//! - [`logging`]: Subscriber setup
//! - [`rules`]: Rule types, rule store and classifier

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod logging;
pub mod rules;

// Re-export commonly used types at the crate root
pub use config::{Config, LogConfig, RulesConfig};
pub use error::{AddressError, ConfigError, FilterError, RuleError};
pub use rules::{
    AddressMatcher, BucketKey, Decision, Direction, Packet, PacketClassifier, PortRange, Protocol,
    RuleRecord, RuleStore, RuleStoreBuilder,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
