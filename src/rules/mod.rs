//! Rule index and packet classification
//!
//! This module provides:
//! - Rule type definitions and line parsing
//! - The load-once [`RuleStore`] index
//! - The stateless [`PacketClassifier`]
//!
//! # Architecture
//!
//! Rules are grouped into four buckets, one per (direction, protocol) pair.
//! Each bucket maps a port to the set of address matchers permitted on it.
//! Port ranges are expanded when the store is built.
//!
//! A packet is accepted if any matcher at its bucket and port contains its
//! address. Matchers are unordered; there is no rule priority. A port with
//! no matchers denies everything.
//!
//! # Example
//!
//! ```
//! use static_firewall::rules::{PacketClassifier, RuleStore};
//!
//! let store = RuleStore::from_lines([
//!     "inbound,tcp,80,192.168.1.2",
//!     "inbound,udp,53,192.168.1.1-192.168.2.5",
//!     "outbound,tcp,10000-20000,192.168.10.11",
//! ])
//! .unwrap();
//!
//! let classifier = PacketClassifier::new(&store);
//! assert!(classifier.accept("inbound", "tcp", 80, "192.168.1.2").unwrap());
//! assert!(classifier.accept("inbound", "udp", 53, "192.168.2.1").unwrap());
//! assert!(classifier.accept("outbound", "tcp", 10234, "192.168.10.11").unwrap());
//! assert!(!classifier.accept("inbound", "tcp", 81, "192.168.1.2").unwrap());
//! assert!(!classifier.accept("inbound", "udp", 24, "52.12.48.92").unwrap());
//! ```

pub mod classifier;
pub mod store;
pub mod types;

// Re-exports
pub use classifier::{Decision, Packet, PacketClassifier};
pub use store::{
    MatcherSet, PortRuleTable, RuleStore, RuleStoreBuilder, StoreStats, INLINE_ORIGIN,
};
pub use types::*;
