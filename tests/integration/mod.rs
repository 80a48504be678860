//! Integration tests for static-firewall
//!
//! # Test Organization
//!
//! - `filter_properties`: accept/deny behavior through the public API
//! - `rule_loading`: rule files, configuration files and inline rules
//! - `concurrency`: classification from many threads over one store
//!
//! # Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test --test integration_tests
//!
//! # Run specific test module
//! cargo test --test integration_tests rule_loading
//! ```

pub mod concurrency;
pub mod filter_properties;
