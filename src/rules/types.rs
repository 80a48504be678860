//! Core rule types for the packet filter
//!
//! This module defines the fundamental types for filter rules:
//! - [`Direction`] and [`Protocol`]: the two halves of a bucket key
//! - [`BucketKey`]: one of the four (direction, protocol) combinations
//! - [`PortRange`]: a single port or inclusive port range
//! - [`AddressMatcher`]: an exact address or inclusive address range
//! - [`RuleRecord`]: one parsed rule line

use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{AddressError, RuleError};

/// Traffic direction relative to the protected boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Traffic entering the boundary
    Inbound,
    /// Traffic leaving the boundary
    Outbound,
}

impl Direction {
    /// Parse a direction token (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDirection` for anything other than
    /// `inbound` or `outbound`.
    pub fn parse(s: &str) -> Result<Self, RuleError> {
        match s.trim().to_lowercase().as_str() {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            _ => Err(RuleError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inbound => write!(f, "inbound"),
            Self::Outbound => write!(f, "outbound"),
        }
    }
}

/// Transport-layer protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Transmission Control Protocol
    Tcp,
    /// User Datagram Protocol
    Udp,
}

impl Protocol {
    /// Parse a protocol token (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidProtocol` for anything other than `tcp` or `udp`.
    pub fn parse(s: &str) -> Result<Self, RuleError> {
        match s.trim().to_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            _ => Err(RuleError::InvalidProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// A (direction, protocol) pair selecting one of the four rule buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub direction: Direction,
    pub protocol: Protocol,
}

impl BucketKey {
    /// Number of distinct buckets
    pub const COUNT: usize = 4;

    /// Every bucket, in index order
    pub const ALL: [Self; Self::COUNT] = [
        Self::new(Direction::Inbound, Protocol::Tcp),
        Self::new(Direction::Inbound, Protocol::Udp),
        Self::new(Direction::Outbound, Protocol::Tcp),
        Self::new(Direction::Outbound, Protocol::Udp),
    ];

    #[must_use]
    pub const fn new(direction: Direction, protocol: Protocol) -> Self {
        Self {
            direction,
            protocol,
        }
    }

    /// Resolve string tokens to a bucket
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if either token is unrecognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use static_firewall::rules::{BucketKey, Direction, Protocol};
    ///
    /// let key = BucketKey::parse("outbound", "UDP").unwrap();
    /// assert_eq!(key, BucketKey::new(Direction::Outbound, Protocol::Udp));
    /// assert!(BucketKey::parse("inbound", "icmp").is_err());
    /// ```
    pub fn parse(direction: &str, protocol: &str) -> Result<Self, RuleError> {
        Ok(Self::new(Direction::parse(direction)?, Protocol::parse(protocol)?))
    }

    /// Position of this bucket in [`BucketKey::ALL`]
    #[must_use]
    pub const fn index(&self) -> usize {
        let dir = match self.direction {
            Direction::Inbound => 0,
            Direction::Outbound => 2,
        };
        let proto = match self.protocol {
            Protocol::Tcp => 0,
            Protocol::Udp => 1,
        };
        dir + proto
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.direction, self.protocol)
    }
}

/// A range of ports for port-based matching
///
/// Supports both single ports and ranges (e.g., "80" or "80-443").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    /// Start of the range (inclusive)
    pub start: u16,
    /// End of the range (inclusive)
    pub end: u16,
}

impl PortRange {
    /// Create a new port range
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPortRange` if start > end.
    ///
    /// # Examples
    ///
    /// ```
    /// use static_firewall::rules::PortRange;
    ///
    /// let range = PortRange::new(80, 443).unwrap();
    /// assert!(range.contains(80));
    /// assert!(range.contains(443));
    /// assert!(!range.contains(8080));
    /// ```
    pub fn new(start: u16, end: u16) -> Result<Self, RuleError> {
        if start > end {
            return Err(RuleError::InvalidPortRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create a range for a single port
    #[must_use]
    pub const fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// Check if a port is within this range
    #[must_use]
    pub const fn contains(&self, port: u16) -> bool {
        port >= self.start && port <= self.end
    }

    /// Iterate every port in the range
    pub fn ports(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }

    /// Number of ports covered
    #[must_use]
    pub const fn port_count(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Parse a port range from a string
    ///
    /// Accepts formats:
    /// - Single port: "80"
    /// - Port range: "80-443"
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPort` if a bound is not a number in
    /// 0-65535, or `RuleError::InvalidPortRange` if start > end.
    ///
    /// # Examples
    ///
    /// ```
    /// use static_firewall::rules::PortRange;
    ///
    /// let single = PortRange::parse("443").unwrap();
    /// assert_eq!(single.start, 443);
    /// assert_eq!(single.end, 443);
    ///
    /// let range = PortRange::parse("80-443").unwrap();
    /// assert_eq!(range.start, 80);
    /// assert_eq!(range.end, 443);
    ///
    /// // Invalid range (start > end)
    /// assert!(PortRange::parse("443-80").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, RuleError> {
        let s = s.trim();

        if let Some((start_str, end_str)) = s.split_once('-') {
            Self::new(parse_port(start_str)?, parse_port(end_str)?)
        } else {
            Ok(Self::single(parse_port(s)?))
        }
    }

    /// Check if this range represents a single port
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

// `u16::from_str` accepts a leading '+', so digits are checked first.
fn parse_port(s: &str) -> Result<u16, RuleError> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RuleError::InvalidPort(s.to_string()));
    }
    s.parse::<u16>()
        .map_err(|_| RuleError::InvalidPort(s.to_string()))
}

/// Pack four octets big-endian into a `u32`
///
/// # Examples
///
/// ```
/// use static_firewall::rules::ipv4_to_u32;
/// use std::net::Ipv4Addr;
///
/// assert_eq!(ipv4_to_u32(Ipv4Addr::new(0, 0, 0, 0)), 0);
/// assert_eq!(ipv4_to_u32(Ipv4Addr::new(0, 0, 1, 2)), 258);
/// assert_eq!(ipv4_to_u32(Ipv4Addr::BROADCAST), u32::MAX);
/// ```
#[must_use]
pub fn ipv4_to_u32(addr: Ipv4Addr) -> u32 {
    addr.octets()
        .iter()
        .fold(0u32, |acc, &octet| (acc << 8) | u32::from(octet))
}

/// Parse a dotted-quad string into its packed 32-bit form
///
/// # Errors
///
/// Returns `AddressError::Malformed` unless the input is exactly four
/// decimal octets in 0-255. Surrounding whitespace is not accepted.
pub fn parse_ipv4(s: &str) -> Result<u32, AddressError> {
    Ipv4Addr::from_str(s)
        .map(ipv4_to_u32)
        .map_err(|_| AddressError::Malformed(s.to_string()))
}

/// Address predicate attached to a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressMatcher {
    /// Matches one address
    Exact(u32),
    /// Matches every address in `min..=max`
    Range { min: u32, max: u32 },
}

impl AddressMatcher {
    /// Build a range matcher, swapping the endpoints if given in reverse
    #[must_use]
    pub fn range(a: u32, b: u32) -> Self {
        Self::Range {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Parse an address specifier: `a.b.c.d` or `a.b.c.d-e.f.g.h`
    ///
    /// # Errors
    ///
    /// Returns `AddressError::Malformed` if any dotted-quad is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use static_firewall::rules::{parse_ipv4, AddressMatcher};
    ///
    /// let m = AddressMatcher::parse("192.168.1.1-192.168.1.10").unwrap();
    /// assert!(m.matches(parse_ipv4("192.168.1.5").unwrap()));
    /// assert!(!m.matches(parse_ipv4("192.168.1.11").unwrap()));
    /// ```
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        if let Some((min, max)) = s.split_once('-') {
            Ok(Self::range(parse_ipv4(min.trim())?, parse_ipv4(max.trim())?))
        } else {
            Ok(Self::Exact(parse_ipv4(s)?))
        }
    }

    /// Check whether a packed address satisfies this matcher
    #[must_use]
    pub const fn matches(&self, addr: u32) -> bool {
        match *self {
            Self::Exact(value) => addr == value,
            Self::Range { min, max } => addr >= min && addr <= max,
        }
    }
}

impl fmt::Display for AddressMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Exact(value) => write!(f, "{}", Ipv4Addr::from(value)),
            Self::Range { min, max } => {
                write!(f, "{}-{}", Ipv4Addr::from(min), Ipv4Addr::from(max))
            }
        }
    }
}

/// One parsed rule line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleRecord {
    pub bucket: BucketKey,
    pub ports: PortRange,
    pub address: AddressMatcher,
}

impl RuleRecord {
    /// Build a record from its four raw fields
    ///
    /// # Errors
    ///
    /// Returns `RuleError` for bad direction, protocol or port fields and
    /// `AddressError` for a bad address field.
    pub fn from_fields(
        direction: &str,
        protocol: &str,
        ports: &str,
        address: &str,
    ) -> Result<Self, crate::error::FilterError> {
        Ok(Self {
            bucket: BucketKey::parse(direction, protocol)?,
            ports: PortRange::parse(ports)?,
            address: AddressMatcher::parse(address)?,
        })
    }

    /// Parse a `direction,protocol,ports,address` line
    ///
    /// # Errors
    ///
    /// Returns `RuleError::FieldCount` unless the line has exactly four
    /// fields, otherwise as [`RuleRecord::from_fields`].
    ///
    /// # Examples
    ///
    /// ```
    /// use static_firewall::rules::RuleRecord;
    ///
    /// let rule = RuleRecord::parse_line("outbound,udp,10000-10010,10.0.0.1-10.0.0.255").unwrap();
    /// assert_eq!(rule.ports.port_count(), 11);
    /// assert_eq!(rule.to_string(), "outbound,udp,10000-10010,10.0.0.1-10.0.0.255");
    /// ```
    pub fn parse_line(line: &str) -> Result<Self, crate::error::FilterError> {
        let fields: Vec<&str> = line.trim().split(',').collect();
        match fields.as_slice() {
            [direction, protocol, ports, address] => {
                Self::from_fields(direction, protocol, ports, address)
            }
            _ => Err(RuleError::FieldCount(fields.len()).into()),
        }
    }
}

impl fmt::Display for RuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.bucket, self.ports, self.address)
    }
}

impl FromStr for RuleRecord {
    type Err = crate::error::FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}
