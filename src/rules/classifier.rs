//! Accept/deny decisions over a loaded [`RuleStore`].
//!
//! The classifier borrows the store and holds no state of its own. A packet
//! is accepted when any matcher attached to its bucket and port contains its
//! address; otherwise it is denied.
//!
//! # Example
//!
//! ```
//! use static_firewall::rules::{PacketClassifier, RuleStore};
//!
//! let store = RuleStore::from_lines(["inbound,tcp,443,192.168.1.1-192.168.1.10"]).unwrap();
//! let classifier = PacketClassifier::new(&store);
//!
//! assert!(classifier.accept("inbound", "tcp", 443, "192.168.1.5").unwrap());
//! assert!(!classifier.accept("inbound", "tcp", 443, "192.168.1.11").unwrap());
//! assert!(classifier.accept("inbound", "tcp", 443, "192.168.1").is_err());
//! ```

use std::net::Ipv4Addr;

use tracing::trace;

use super::store::RuleStore;
use super::types::{ipv4_to_u32, parse_ipv4, AddressMatcher, BucketKey, Direction, Protocol};
use crate::error::FilterError;

/// Packet metadata for classification.
///
/// # Example
///
/// ```
/// use static_firewall::rules::{Direction, Packet, Protocol};
/// use std::net::Ipv4Addr;
///
/// let packet = Packet::new(Direction::Outbound, Protocol::Udp, 53, Ipv4Addr::new(8, 8, 8, 8));
/// assert_eq!(packet.port, 53);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub direction: Direction,
    pub protocol: Protocol,
    pub port: u16,
    pub address: Ipv4Addr,
}

impl Packet {
    #[must_use]
    pub const fn new(direction: Direction, protocol: Protocol, port: u16, address: Ipv4Addr) -> Self {
        Self {
            direction,
            protocol,
            port,
            address,
        }
    }

    /// Bucket this packet is looked up in
    #[must_use]
    pub const fn bucket(&self) -> BucketKey {
        BucketKey::new(self.direction, self.protocol)
    }
}

/// Result of classifying a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the packet is permitted
    pub accepted: bool,

    /// The matcher that accepted the packet.
    ///
    /// `None` means the packet was denied by default.
    pub matched: Option<AddressMatcher>,
}

impl Decision {
    const DENY: Self = Self {
        accepted: false,
        matched: None,
    };
}

/// Stateless decision function over a borrowed rule store.
#[derive(Debug, Clone, Copy)]
pub struct PacketClassifier<'a> {
    store: &'a RuleStore,
}

impl<'a> PacketClassifier<'a> {
    #[must_use]
    pub const fn new(store: &'a RuleStore) -> Self {
        Self { store }
    }

    /// The store this classifier reads from
    #[must_use]
    pub const fn store(&self) -> &'a RuleStore {
        self.store
    }

    /// Decide whether a packet given as raw strings is permitted
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Address` if `address` is not a valid dotted-quad
    /// (surrounding whitespace included), and `FilterError::Rule` if the
    /// direction or protocol is unrecognized.
    /// A packet that matches no rule is not an error; it yields `Ok(false)`.
    pub fn accept(
        &self,
        direction: &str,
        protocol: &str,
        port: u16,
        address: &str,
    ) -> Result<bool, FilterError> {
        let addr = parse_ipv4(address)?;
        let bucket = BucketKey::parse(direction, protocol)?;
        Ok(self.decide(bucket, port, addr).accepted)
    }

    /// Decide whether an already-parsed packet is permitted
    #[must_use]
    pub fn accept_packet(&self, packet: &Packet) -> bool {
        self.evaluate(packet).accepted
    }

    /// Classify a packet, reporting which matcher accepted it
    #[must_use]
    pub fn evaluate(&self, packet: &Packet) -> Decision {
        self.decide(packet.bucket(), packet.port, ipv4_to_u32(packet.address))
    }

    fn decide(&self, bucket: BucketKey, port: u16, addr: u32) -> Decision {
        let matchers = self.store.lookup(bucket, port);
        if matchers.is_empty() {
            trace!("deny {bucket},{port},{}: no rules for port", Ipv4Addr::from(addr));
            return Decision::DENY;
        }

        let decision = matchers
            .iter()
            .find(|m| m.matches(addr))
            .map_or(Decision::DENY, |m| Decision {
                accepted: true,
                matched: Some(*m),
            });
        trace!(
            "{} {bucket},{port},{}",
            if decision.accepted { "accept" } else { "deny" },
            Ipv4Addr::from(addr)
        );
        decision
    }
}
