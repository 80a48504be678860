//! Rule index built once from rule records.
//!
//! The store keeps one [`PortRuleTable`] per [`BucketKey`]. Port ranges are
//! expanded at load time, so a lookup is a single hash-map access.
//!
//! ```text
//! rule lines -> RuleRecord::parse_line() -> RuleStoreBuilder::add_record()
//!                                                   |
//!                                     expand ports, insert matcher
//!                                                   |
//!                                 RuleStoreBuilder::build() -> RuleStore
//! ```
//!
//! # Example
//!
//! ```
//! use static_firewall::rules::{BucketKey, Direction, Protocol, RuleStore};
//!
//! let store = RuleStore::from_lines(["inbound,tcp,80-81,10.0.0.1"]).unwrap();
//! let key = BucketKey::new(Direction::Inbound, Protocol::Tcp);
//! assert_eq!(store.lookup(key, 81).len(), 1);
//! assert!(store.lookup(key, 82).is_empty());
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use super::types::{AddressMatcher, BucketKey, Direction, Protocol, RuleRecord};
use crate::config::RulesConfig;
use crate::error::FilterError;

/// Matchers attached to one port
pub type MatcherSet = BTreeSet<AddressMatcher>;

/// Port number to matcher set, for a single bucket
pub type PortRuleTable = HashMap<u16, MatcherSet>;

static NO_MATCHERS: MatcherSet = BTreeSet::new();

/// Origin attached to errors from `rules.inline`
pub const INLINE_ORIGIN: &str = "inline rules";

/// Immutable rule index.
///
/// Constructed through [`RuleStoreBuilder`] or one of the `from_*`
/// constructors; no rule can be added or removed afterwards.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    buckets: [PortRuleTable; BucketKey::COUNT],
    records: usize,
}

impl RuleStore {
    /// Start building a store
    #[must_use]
    pub fn builder() -> RuleStoreBuilder {
        RuleStoreBuilder::new()
    }

    /// Build a store from already-parsed records
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = RuleRecord>) -> Self {
        let mut builder = RuleStoreBuilder::new();
        for record in records {
            builder.add_record(record);
        }
        builder.build()
    }

    /// Build a store from rule lines
    ///
    /// Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first line's error, tagged with its 1-based line number.
    /// Nothing is loaded if any line fails.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = RuleStoreBuilder::new();
        builder.add_lines(lines)?;
        Ok(builder.build())
    }

    /// Build a store from a buffered reader of rule lines
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Io` if reading fails, otherwise as
    /// [`RuleStore::from_lines`].
    pub fn from_reader(reader: impl BufRead) -> Result<Self, FilterError> {
        let mut builder = RuleStoreBuilder::new();
        builder.add_reader(reader)?;
        Ok(builder.build())
    }

    /// Build a store from a rule file
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Io` if the file cannot be opened or read,
    /// otherwise as [`RuleStore::from_lines`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FilterError> {
        let mut builder = RuleStoreBuilder::new();
        builder.add_path(path)?;
        Ok(builder.build())
    }

    /// Build a store from the rule sources in a configuration
    ///
    /// The rule file (if any) is loaded first, then inline rules.
    ///
    /// # Errors
    ///
    /// Returns the first error from either source, tagged with the file
    /// path or [`INLINE_ORIGIN`].
    pub fn from_config(config: &RulesConfig) -> Result<Self, FilterError> {
        let mut builder = RuleStoreBuilder::new();
        if let Some(path) = &config.path {
            builder.add_path(path)?;
        }
        builder
            .add_lines(&config.inline)
            .map_err(|e| e.in_origin(INLINE_ORIGIN))?;
        Ok(builder.build())
    }

    /// Matchers attached to `port` in the given bucket
    ///
    /// Returns an empty set if no rule covers the port.
    #[must_use]
    pub fn lookup(&self, key: BucketKey, port: u16) -> &MatcherSet {
        self.table(key).get(&port).unwrap_or(&NO_MATCHERS)
    }

    /// Convenience form of [`RuleStore::lookup`] taking direction and protocol
    #[must_use]
    pub fn lookup_by(&self, direction: Direction, protocol: Protocol, port: u16) -> &MatcherSet {
        self.lookup(BucketKey::new(direction, protocol), port)
    }

    /// The full port table of one bucket
    #[must_use]
    pub fn table(&self, key: BucketKey) -> &PortRuleTable {
        &self.buckets[key.index()]
    }

    /// Number of records that were loaded, duplicates included
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.records
    }

    /// Check if no rule was loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(HashMap::is_empty)
    }

    /// Get summary statistics about this store
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let mut ports = [0; BucketKey::COUNT];
        let mut matchers = 0;
        for (i, table) in self.buckets.iter().enumerate() {
            ports[i] = table.len();
            matchers += table.values().map(BTreeSet::len).sum::<usize>();
        }
        StoreStats {
            records: self.records,
            ports,
            matchers,
        }
    }
}

/// Statistics about a rule store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Records loaded, duplicates included
    pub records: usize,

    /// Ports with at least one matcher, indexed by [`BucketKey::index`]
    pub ports: [usize; BucketKey::COUNT],

    /// Total (port, matcher) entries across all buckets
    pub matchers: usize,
}

impl StoreStats {
    /// Ports with at least one matcher in `key`
    #[must_use]
    pub const fn ports_in(&self, key: BucketKey) -> usize {
        self.ports[key.index()]
    }
}

/// Builder for `RuleStore`.
///
/// # Example
///
/// ```
/// use static_firewall::rules::{RuleRecord, RuleStoreBuilder};
///
/// let mut builder = RuleStoreBuilder::new();
/// builder
///     .add_line("inbound,tcp,443,192.168.1.1-192.168.1.10")
///     .unwrap()
///     .add_record(RuleRecord::parse_line("outbound,udp,53,8.8.8.8").unwrap());
///
/// let store = builder.build();
/// assert_eq!(store.record_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RuleStoreBuilder {
    store: RuleStore,
}

impl RuleStoreBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record's matcher at every port in its range
    pub fn add_record(&mut self, record: RuleRecord) -> &mut Self {
        let table = &mut self.store.buckets[record.bucket.index()];
        for port in record.ports.ports() {
            table.entry(port).or_default().insert(record.address);
        }
        self.store.records += 1;
        debug!("Indexed rule {record}");
        self
    }

    /// Parse and insert one rule line
    ///
    /// Blank lines and `#` comments are accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Rule` or `FilterError::Address` if the line is invalid.
    pub fn add_line(&mut self, line: &str) -> Result<&mut Self, FilterError> {
        if is_skippable(line) {
            return Ok(self);
        }
        let record = RuleRecord::parse_line(line)?;
        Ok(self.add_record(record))
    }

    /// Parse and insert a sequence of rule lines
    ///
    /// # Errors
    ///
    /// Returns the first failing line's error, tagged with its 1-based line
    /// number. Every line is parsed before any is inserted, so on error the
    /// builder is left unchanged.
    pub fn add_lines<I, S>(&mut self, lines: I) -> Result<&mut Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = Vec::new();
        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if is_skippable(line) {
                continue;
            }
            match RuleRecord::parse_line(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Rejected rule at line {}: {:?}: {}", i + 1, line, e);
                    return Err(e.at_line(i + 1));
                }
            }
        }
        for record in records {
            self.add_record(record);
        }
        Ok(self)
    }

    /// Parse and insert every line from a reader
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Io` on read failure, otherwise as
    /// [`RuleStoreBuilder::add_lines`].
    pub fn add_reader(&mut self, reader: impl BufRead) -> Result<&mut Self, FilterError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        self.add_lines(lines)
    }

    /// Parse and insert every line from a rule file
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Io` if the file cannot be opened or read,
    /// otherwise as [`RuleStoreBuilder::add_lines`]. Errors are tagged with
    /// the file path.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, FilterError> {
        let path = path.as_ref();
        debug!("Loading rules from {:?}", path);
        let origin = || path.display().to_string();
        let file = File::open(path).map_err(|e| FilterError::from(e).in_origin(origin()))?;
        self.add_reader(BufReader::new(file))
            .map_err(|e| e.in_origin(origin()))
    }

    /// Finish loading and return the read-only store
    #[must_use]
    pub fn build(self) -> RuleStore {
        let stats = self.store.stats();
        info!(
            "Rule store loaded: {} records, {} port entries",
            stats.records, stats.matchers
        );
        self.store
    }
}

fn is_skippable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}
