//! Subcommand implementations.

use std::collections::BTreeMap;

use anyhow::Context;
use clap::Subcommand;
use hashring::{HashRing, RingBuilder, DEFAULT_VNODES};
use tracing::info;

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the node responsible for a single key.
    Lookup {
        /// Node labels forming the ring (repeatable).
        #[arg(long = "node", value_name = "LABEL", required = true)]
        nodes: Vec<String>,
        /// Virtual nodes per node.
        #[arg(long, default_value_t = DEFAULT_VNODES)]
        vnodes: u32,
        /// Key to look up.
        key: String,
    },
    /// Distribute a batch of keys and print the grouping as JSON.
    Distribute {
        /// Node labels forming the ring (repeatable).
        #[arg(long = "node", value_name = "LABEL", required = true)]
        nodes: Vec<String>,
        /// Virtual nodes per node.
        #[arg(long, default_value_t = DEFAULT_VNODES)]
        vnodes: u32,
        /// Keys to distribute.
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Walk through the classic rebalancing scenario: three nodes, nine
    /// keys, then add a node and remove one.
    Rebalance {
        /// Virtual nodes per node.
        #[arg(long, default_value_t = DEFAULT_VNODES)]
        vnodes: u32,
    },
    /// Report how evenly the ring spreads keys across its nodes.
    Stats {
        /// Node labels forming the ring (repeatable).
        #[arg(long = "node", value_name = "LABEL", required = true)]
        nodes: Vec<String>,
        /// Virtual nodes per node.
        #[arg(long, default_value_t = DEFAULT_VNODES)]
        vnodes: u32,
        /// Number of sample keys to route.
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },
}

impl Command {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Lookup { nodes, vnodes, key } => lookup(&nodes, vnodes, &key),
            Command::Distribute {
                nodes,
                vnodes,
                keys,
            } => distribute(&nodes, vnodes, &keys),
            Command::Rebalance { vnodes } => rebalance(vnodes),
            Command::Stats {
                nodes,
                vnodes,
                samples,
            } => stats(&nodes, vnodes, samples),
        }
    }
}

fn build_ring(nodes: &[String], vnodes: u32) -> anyhow::Result<HashRing> {
    let ring = RingBuilder::new()
        .with_vnodes(vnodes)
        .add_nodes(nodes.iter().cloned())
        .build()
        .context("failed to build ring")?;
    info!(
        nodes = ring.node_count(),
        positions = ring.position_count(),
        "ring ready"
    );
    Ok(ring)
}

fn lookup(nodes: &[String], vnodes: u32, key: &str) -> anyhow::Result<()> {
    let ring = build_ring(nodes, vnodes)?;
    let owner = ring.get_node(key)?;
    println!("{}", owner);
    Ok(())
}

fn distribute(nodes: &[String], vnodes: u32, keys: &[String]) -> anyhow::Result<()> {
    let ring = build_ring(nodes, vnodes)?;
    println!("{}", render_distribution(&ring, keys)?);
    Ok(())
}

/// The original consistent-hashing walkthrough: distribute nine keys over
/// three nodes, then watch the distribution shift as NodeD joins and NodeB
/// leaves.
fn rebalance(vnodes: u32) -> anyhow::Result<()> {
    let ring = RingBuilder::new()
        .with_vnodes(vnodes)
        .add_nodes(["NodeA", "NodeB", "NodeC"])
        .build()?;
    let keys: Vec<String> = (1..=9).map(|i| format!("Key{}", i)).collect();

    println!("Initial Key Distribution:");
    println!("{}", render_distribution(&ring, &keys)?);

    println!("\nAdding NodeD...");
    ring.add_node("NodeD")?;
    println!("Key Distribution After Adding NodeD:");
    println!("{}", render_distribution(&ring, &keys)?);

    println!("\nRemoving NodeB...");
    ring.remove_node("NodeB");
    println!("Key Distribution After Removing NodeB:");
    println!("{}", render_distribution(&ring, &keys)?);

    Ok(())
}

fn stats(nodes: &[String], vnodes: u32, samples: usize) -> anyhow::Result<()> {
    let ring = build_ring(nodes, vnodes)?;
    let stats = ring.stats(samples)?;

    println!(
        "nodes: {}  positions: {}  vnodes/node: {}  samples: {}",
        stats.node_count, stats.position_count, stats.vnodes_per_node, stats.samples
    );
    let counts: BTreeMap<&String, &usize> = stats.keys_per_node.iter().collect();
    for (node, count) in counts {
        println!(
            "  {:<20} {:>8}  ({:.1}%)",
            node,
            count,
            100.0 * *count as f64 / stats.samples as f64
        );
    }
    println!(
        "stddev: {:.4}  min: {:.4}  max: {:.4}",
        stats.distribution_stddev, stats.min_fraction, stats.max_fraction
    );
    Ok(())
}

/// Render a key distribution as JSON with stable (sorted) node order.
fn render_distribution(ring: &HashRing, keys: &[String]) -> anyhow::Result<String> {
    let distribution: BTreeMap<String, Vec<String>> =
        ring.distribute_keys(keys)?.into_iter().collect();
    Ok(serde_json::to_string_pretty(&distribution)?)
}
