//! Concurrent read-only classification against one store

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::thread;

use static_firewall::{Direction, Packet, PacketClassifier, Protocol, RuleStore};

fn shared_store() -> RuleStore {
    RuleStore::from_lines([
        "inbound,tcp,1-1024,10.0.0.0-10.0.0.255",
        "outbound,udp,53,1.1.1.1",
    ])
    .unwrap()
}

#[test]
fn test_scoped_threads_share_borrowed_store() {
    let store = shared_store();

    thread::scope(|s| {
        for worker in 0u8..8 {
            let store = &store;
            s.spawn(move || {
                let classifier = PacketClassifier::new(store);
                for port in 1..=1024u16 {
                    let packet = Packet::new(
                        Direction::Inbound,
                        Protocol::Tcp,
                        port,
                        Ipv4Addr::new(10, 0, 0, worker),
                    );
                    assert!(classifier.accept_packet(&packet));
                }
                assert!(!classifier.accept("inbound", "tcp", 1025, "10.0.0.1").unwrap());
            });
        }
    });
}

#[test]
fn test_arc_store_across_threads() {
    let store = Arc::new(shared_store());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let classifier = PacketClassifier::new(&store);
                let expected = i % 2 == 0;
                let addr = if expected { "1.1.1.1" } else { "1.0.0.1" };
                (0..1000)
                    .all(|_| classifier.accept("outbound", "udp", 53, addr).unwrap() == expected)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
