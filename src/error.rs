//! Error types for static-firewall
//!
//! Errors are grouped by subsystem. Rule and address validation errors are
//! kept apart so callers can tell a malformed rule from a malformed address,
//! both at load time and at query time.

use std::io;

use thiserror::Error;

/// Top-level error type for static-firewall
#[derive(Debug, Error)]
pub enum FilterError {
    /// Malformed rule fields (direction, protocol, port)
    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),

    /// Malformed dotted-quad address
    #[error("Invalid address: {0}")]
    Address(#[from] AddressError),

    /// Configuration errors (file parsing, validation)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors while reading a rule source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A rule line failed to load
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number in the rule source
        line: usize,
        #[source]
        source: Box<FilterError>,
    },

    /// A rule source (file path or inline rules) failed to load
    #[error("{origin}: {source}")]
    InSource {
        /// File path or other name of the rule source
        origin: String,
        #[source]
        source: Box<FilterError>,
    },
}

impl FilterError {
    /// Attach a 1-based line number to this error
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }

    /// Attach the name of the rule source this error came from
    #[must_use]
    pub fn in_origin(self, origin: impl Into<String>) -> Self {
        Self::InSource {
            origin: origin.into(),
            source: Box::new(self),
        }
    }

    /// The error with any line or source context stripped
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::AtLine { source, .. } | Self::InSource { source, .. } => source.root(),
            other => other,
        }
    }

    /// Line number of the failing rule, if known
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            Self::InSource { source, .. } => source.line(),
            _ => None,
        }
    }

    /// Rule source the error came from, if known
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        match self {
            Self::InSource { origin, .. } => Some(origin.as_str()),
            Self::AtLine { source, .. } => source.origin(),
            _ => None,
        }
    }

    /// Check if the root cause is a rule validation error
    #[must_use]
    pub fn is_rule_error(&self) -> bool {
        matches!(self.root(), Self::Rule(_))
    }

    /// Check if the root cause is an address validation error
    #[must_use]
    pub fn is_address_error(&self) -> bool {
        matches!(self.root(), Self::Address(_))
    }
}

/// Rule validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Record does not have exactly four comma-separated fields
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    /// Direction is not inbound or outbound
    #[error("unknown direction: {0}")]
    InvalidDirection(String),

    /// Protocol is not tcp or udp
    #[error("unknown protocol: {0}")]
    InvalidProtocol(String),

    /// Port is not a number in 0-65535
    #[error("invalid port number: {0}")]
    InvalidPort(String),

    /// Port range start is greater than its end
    #[error("invalid port range: {start}-{end}")]
    InvalidPortRange { start: u16, end: u16 },
}

/// Address validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Not four valid decimal octets
    #[error("malformed IPv4 address: {0}")]
    Malformed(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found or inaccessible
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Validation error (invalid values, missing required fields)
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Environment variable error
    #[error("Environment variable error: {name}: {reason}")]
    EnvError { name: String, reason: String },

    /// I/O error while reading config
    #[error("I/O error reading configuration: {0}")]
    IoError(#[from] io::Error),
}
