//! Decision properties of the packet filter
//!
//! # Test Categories
//!
//! - `default_deny`: packets without a rule are rejected
//! - `matching`: exact, range and port-range behavior
//! - `isolation`: buckets never leak into each other
//! - `invalid_input`: malformed inputs are errors, not denials

use static_firewall::rules::parse_ipv4;
use static_firewall::{FilterError, PacketClassifier, RuleError, RuleStore};

const BUCKETS: [(&str, &str); 4] = [
    ("inbound", "tcp"),
    ("inbound", "udp"),
    ("outbound", "tcp"),
    ("outbound", "udp"),
];

fn load(lines: &[&str]) -> RuleStore {
    RuleStore::from_lines(lines).expect("rules should load")
}

// ============================================================================
// Default Deny
// ============================================================================

mod default_deny {
    use super::*;

    #[test]
    fn test_no_rules_denies_everything() {
        let store = RuleStore::default();
        let classifier = PacketClassifier::new(&store);

        for (direction, protocol) in BUCKETS {
            for port in [0, 1, 80, 443, 65535] {
                assert!(!classifier
                    .accept(direction, protocol, port, "192.168.1.1")
                    .unwrap());
            }
        }
    }

    #[test]
    fn test_untouched_port_denies() {
        let store = load(&["inbound,tcp,80,0.0.0.0-255.255.255.255"]);
        let classifier = PacketClassifier::new(&store);

        assert!(classifier.accept("inbound", "tcp", 80, "8.8.8.8").unwrap());
        assert!(!classifier.accept("inbound", "tcp", 79, "8.8.8.8").unwrap());
        assert!(!classifier.accept("inbound", "tcp", 81, "8.8.8.8").unwrap());
    }
}

// ============================================================================
// Matching
// ============================================================================

mod matching {
    use super::*;

    #[test]
    fn test_exact_match() {
        let store = load(&["inbound,tcp,80,10.0.0.5"]);
        let classifier = PacketClassifier::new(&store);

        assert!(classifier.accept("inbound", "tcp", 80, "10.0.0.5").unwrap());
        assert!(!classifier.accept("inbound", "tcp", 80, "10.0.0.6").unwrap());
    }

    #[test]
    fn test_port_range_expansion() {
        let store = load(&["outbound,udp,100-102,1.2.3.4"]);
        let classifier = PacketClassifier::new(&store);

        for port in 100..=102 {
            assert!(classifier.accept("outbound", "udp", port, "1.2.3.4").unwrap());
        }
        assert!(!classifier.accept("outbound", "udp", 99, "1.2.3.4").unwrap());
        assert!(!classifier.accept("outbound", "udp", 103, "1.2.3.4").unwrap());
    }

    #[test]
    fn test_address_range_matching() {
        let store = load(&["inbound,tcp,443,192.168.1.1-192.168.1.10"]);
        let classifier = PacketClassifier::new(&store);

        assert!(classifier.accept("inbound", "tcp", 443, "192.168.1.5").unwrap());
        assert!(classifier.accept("inbound", "tcp", 443, "192.168.1.1").unwrap());
        assert!(classifier.accept("inbound", "tcp", 443, "192.168.1.10").unwrap());
        assert!(!classifier.accept("inbound", "tcp", 443, "192.168.1.11").unwrap());
        assert!(!classifier.accept("inbound", "tcp", 443, "192.168.0.255").unwrap());
    }

    #[test]
    fn test_address_range_crossing_octets() {
        let store = load(&["inbound,udp,53,10.0.255.250-10.1.0.5"]);
        let classifier = PacketClassifier::new(&store);

        assert!(classifier.accept("inbound", "udp", 53, "10.0.255.255").unwrap());
        assert!(classifier.accept("inbound", "udp", 53, "10.1.0.0").unwrap());
        assert!(!classifier.accept("inbound", "udp", 53, "10.1.0.6").unwrap());
        assert!(!classifier.accept("inbound", "udp", 53, "10.0.254.0").unwrap());
    }

    #[test]
    fn test_duplicate_rules_idempotent() {
        let single = load(&["inbound,tcp,80,10.0.0.5"]);
        let doubled = load(&["inbound,tcp,80,10.0.0.5", "inbound,tcp,80,10.0.0.5"]);
        let a = PacketClassifier::new(&single);
        let b = PacketClassifier::new(&doubled);

        for addr in ["10.0.0.4", "10.0.0.5", "10.0.0.6"] {
            assert_eq!(
                a.accept("inbound", "tcp", 80, addr).unwrap(),
                b.accept("inbound", "tcp", 80, addr).unwrap()
            );
        }
    }

    #[test]
    fn test_overlapping_rules_are_a_disjunction() {
        let store = load(&[
            "outbound,tcp,8000-8100,172.16.0.1",
            "outbound,tcp,8050-8200,172.16.0.2-172.16.0.3",
        ]);
        let classifier = PacketClassifier::new(&store);

        assert!(classifier.accept("outbound", "tcp", 8060, "172.16.0.1").unwrap());
        assert!(classifier.accept("outbound", "tcp", 8060, "172.16.0.3").unwrap());
        assert!(!classifier.accept("outbound", "tcp", 8010, "172.16.0.3").unwrap());
        assert!(!classifier.accept("outbound", "tcp", 8150, "172.16.0.1").unwrap());
    }
}

// ============================================================================
// Isolation
// ============================================================================

mod isolation {
    use super::*;

    #[test]
    fn test_rule_only_affects_its_bucket() {
        for (i, (direction, protocol)) in BUCKETS.iter().enumerate() {
            let line = format!("{direction},{protocol},25,10.9.8.7");
            let store = RuleStore::from_lines([line]).unwrap();
            let classifier = PacketClassifier::new(&store);

            for (j, (d, p)) in BUCKETS.iter().enumerate() {
                let accepted = classifier.accept(d, p, 25, "10.9.8.7").unwrap();
                assert_eq!(accepted, i == j, "rule in {direction},{protocol} seen from {d},{p}");
            }
        }
    }
}

// ============================================================================
// Invalid Input
// ============================================================================

mod invalid_input {
    use super::*;

    #[test]
    fn test_malformed_query_address_is_error() {
        let store = load(&["inbound,tcp,80,10.0.0.5"]);
        let classifier = PacketClassifier::new(&store);

        for bad in ["999.1.1.1", "1.2.3", "", "10.0.0.5 extra", "::1"] {
            let err = classifier.accept("inbound", "tcp", 80, bad).unwrap_err();
            assert!(err.is_address_error(), "{bad:?} gave {err}");
        }
    }

    #[test]
    fn test_reversed_port_range_rejected_at_load() {
        let err = RuleStore::from_lines(["inbound,tcp,102-100,1.2.3.4"]).unwrap_err();
        assert!(matches!(
            err.root(),
            FilterError::Rule(RuleError::InvalidPortRange { start: 102, end: 100 })
        ));
    }

    #[test]
    fn test_malformed_rule_address_rejected_at_load() {
        let err = RuleStore::from_lines(["inbound,tcp,80,10.0.0.300"]).unwrap_err();
        assert!(err.is_address_error());

        let err = RuleStore::from_lines(["inbound,tcp,80,10.0.0.1-10.0.0"]).unwrap_err();
        assert!(err.is_address_error());
    }

    #[test]
    fn test_bad_rule_fields_rejected_at_load() {
        for line in [
            "forward,tcp,80,10.0.0.1",
            "inbound,icmp,80,10.0.0.1",
            "inbound,tcp,http,10.0.0.1",
            "inbound,tcp,70000,10.0.0.1",
            "inbound,tcp,80",
        ] {
            let err = RuleStore::from_lines([line]).unwrap_err();
            assert!(err.is_rule_error(), "{line:?} gave {err}");
        }
    }
}

// ============================================================================
// Address Conversion
// ============================================================================

#[test]
fn test_address_conversion_bounds() {
    assert_eq!(parse_ipv4("255.255.255.255").unwrap(), u32::MAX);
    assert_eq!(parse_ipv4("0.0.0.0").unwrap(), 0);
    assert!(parse_ipv4("10.0.0.255").unwrap() < parse_ipv4("10.0.1.0").unwrap());
}
