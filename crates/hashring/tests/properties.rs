//! Property tests for ring invariants.

use std::collections::HashSet;

use hashring::{HashRing, RingBuilder};
use proptest::prelude::*;

fn arb_nodes() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::hash_set("[a-z]{1,12}", 1..8)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    /// For a fixed ring state, lookups are a pure function of the key.
    #[test]
    fn lookup_is_deterministic(nodes in arb_nodes(), key in ".*") {
        let ring = RingBuilder::new()
            .with_vnodes(4)
            .add_nodes(nodes)
            .build()
            .unwrap();

        prop_assert_eq!(ring.get_node(&key).unwrap(), ring.get_node(&key).unwrap());
    }

    /// Any key maps to a node that is currently a member.
    #[test]
    fn lookup_is_total_over_members(nodes in arb_nodes(), keys in proptest::collection::vec(".*", 1..50)) {
        let ring = RingBuilder::new()
            .with_vnodes(4)
            .add_nodes(nodes)
            .build()
            .unwrap();

        let members: HashSet<String> = ring.nodes().into_iter().collect();
        for key in &keys {
            prop_assert!(members.contains(&ring.get_node(key).unwrap()));
        }
    }

    /// Grouped distribution agrees with per-key lookups and loses no keys.
    #[test]
    fn distribution_matches_lookups(nodes in arb_nodes(), keys in proptest::collection::vec("[A-Za-z0-9]{1,16}", 1..50)) {
        let ring = RingBuilder::new()
            .with_vnodes(4)
            .add_nodes(nodes)
            .build()
            .unwrap();

        let distribution = ring.distribute_keys(&keys).unwrap();

        let total: usize = distribution.values().map(Vec::len).sum();
        prop_assert_eq!(total, keys.len());

        for (node, group) in &distribution {
            for key in group {
                prop_assert_eq!(&ring.get_node(key).unwrap(), node);
            }
        }
    }

    /// Removing a label that was never added leaves the ring untouched.
    #[test]
    fn removing_stranger_is_noop(nodes in arb_nodes(), stranger in "[A-Z]{1,12}") {
        prop_assume!(!nodes.contains(&stranger));

        let ring = RingBuilder::new()
            .with_vnodes(4)
            .add_nodes(nodes.clone())
            .build()
            .unwrap();

        prop_assert!(!ring.remove_node(&stranger));
        prop_assert_eq!(ring.node_count(), nodes.len());
        prop_assert_eq!(ring.position_count(), nodes.len() * 4);
    }
}

#[test]
fn empty_ring_has_no_owner_for_anything() {
    let ring = HashRing::new(4).unwrap();
    assert!(ring.get_node("anything").is_err());
}
