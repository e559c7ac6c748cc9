//! Distribution statistics for balance diagnostics.
//!
//! A ring with few virtual nodes per node can assign wildly uneven arcs.
//! [`HashRing::stats`] measures the actual key distribution by routing a
//! deterministic set of sample keys and reporting per-node load fractions.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::ring::HashRing;

/// Statistics about how evenly a ring spreads keys across its nodes.
#[derive(Debug, Clone, Serialize)]
pub struct RingStats {
    /// Number of nodes in the ring.
    pub node_count: usize,
    /// Number of positions (virtual nodes) on the ring.
    pub position_count: usize,
    /// Virtual nodes per node.
    pub vnodes_per_node: u32,
    /// Number of sample keys routed.
    pub samples: usize,
    /// Sample keys routed to each node.
    pub keys_per_node: HashMap<String, usize>,
    /// Standard deviation of per-node load fractions (lower = more even).
    pub distribution_stddev: f64,
    /// Smallest fraction of samples any single node received.
    pub min_fraction: f64,
    /// Largest fraction of samples any single node received.
    pub max_fraction: f64,
}

impl HashRing {
    /// Measure distribution uniformity by routing `samples` synthetic keys.
    ///
    /// Deterministic for a fixed ring state and sample count. The whole
    /// sample batch runs under one read guard.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] with no nodes present, [`Error::InvalidConfig`]
    /// for a zero sample count.
    pub fn stats(&self, samples: usize) -> Result<RingStats> {
        if samples == 0 {
            return Err(Error::InvalidConfig(
                "sample count must be >= 1".to_string(),
            ));
        }

        let state = self.read_state();
        if state.nodes.is_empty() {
            return Err(Error::EmptyRing);
        }

        let mut keys_per_node: HashMap<String, usize> =
            state.nodes.iter().map(|n| (n.clone(), 0)).collect();

        for i in 0..samples {
            let key = format!("ring-stats-sample-{}", i);
            let pos = self.partitioner().position(key.as_bytes());
            if let Some(owner) = state.owner(pos) {
                if let Some(count) = keys_per_node.get_mut(owner) {
                    *count += 1;
                }
            }
        }

        let node_count = state.nodes.len();
        let mean = 1.0 / node_count as f64;
        let mut min_fraction = f64::MAX;
        let mut max_fraction = 0.0f64;
        let mut variance = 0.0;
        for count in keys_per_node.values() {
            let fraction = *count as f64 / samples as f64;
            min_fraction = min_fraction.min(fraction);
            max_fraction = max_fraction.max(fraction);
            variance += (fraction - mean) * (fraction - mean);
        }
        variance /= node_count as f64;

        Ok(RingStats {
            node_count,
            position_count: state.positions.len(),
            vnodes_per_node: self.vnodes_per_node(),
            samples,
            keys_per_node,
            distribution_stddev: variance.sqrt(),
            min_fraction,
            max_fraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::ring::{HashRing, RingBuilder};

    #[test]
    fn single_node_takes_everything() {
        let ring = RingBuilder::new().add_node("only").build().unwrap();
        let stats = ring.stats(1000).unwrap();

        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.keys_per_node["only"], 1000);
        assert_eq!(stats.min_fraction, 1.0);
        assert_eq!(stats.max_fraction, 1.0);
        assert_eq!(stats.distribution_stddev, 0.0);
    }

    #[test]
    fn empty_ring_is_an_error() {
        let ring = HashRing::new(3).unwrap();
        assert_eq!(ring.stats(100).unwrap_err(), Error::EmptyRing);
    }

    #[test]
    fn zero_samples_rejected() {
        let ring = RingBuilder::new().add_node("node1").build().unwrap();
        assert!(matches!(ring.stats(0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn fractions_sum_to_one() {
        let ring = RingBuilder::new()
            .with_vnodes(64)
            .add_nodes(["node1", "node2", "node3"])
            .build()
            .unwrap();
        let stats = ring.stats(10_000).unwrap();

        let total: usize = stats.keys_per_node.values().sum();
        assert_eq!(total, 10_000);
        assert!(stats.min_fraction <= stats.max_fraction);
    }
}
