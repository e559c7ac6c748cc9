//! Core library for consistent hashing.
//!
//! This crate provides the fundamental pieces of a consistent hash ring:
//! - Partitioner algorithms (key -> ring position)
//! - The ring itself: virtual-node placement, ordered lookup, rebalancing
//! - Distribution statistics for balance diagnostics
//!
//! # Example
//!
//! ```
//! use hashring::HashRing;
//!
//! let ring = HashRing::new(3)?;
//! ring.add_node("NodeA")?;
//! ring.add_node("NodeB")?;
//!
//! let owner = ring.get_node("Key1")?;
//! assert!(owner == "NodeA" || owner == "NodeB");
//! # Ok::<(), hashring::Error>(())
//! ```

pub mod error;
pub mod partitioner;
pub mod ring;
pub mod stats;

pub use error::{Error, Result};
pub use partitioner::{Partitioner, SipPartitioner, Xxh3Partitioner};
pub use ring::{HashRing, RingBuilder, DEFAULT_VNODES};
pub use stats::RingStats;
