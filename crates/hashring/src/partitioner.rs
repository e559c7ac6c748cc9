//! Partitioner abstraction for consistent hashing.
//!
//! A partitioner converts keys into `u64` positions on the hash ring. The
//! exact algorithm is not part of the ring's contract; only its properties
//! matter: deterministic, well distributed over the full 64-bit space, no
//! cryptographic strength required.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;
use xxhash_rust::xxh3::xxh3_64;

/// Converts keys into positions on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// position generation without synchronization overhead.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a ring position.
    fn position(&self, key: &[u8]) -> u64;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}

/// XXH3 partitioner (default). Fast, avalanche-quality 64-bit hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    fn position(&self, key: &[u8]) -> u64 {
        xxh3_64(key)
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}

/// SipHash-1-3 partitioner. Keyed-hash alternative to XXH3.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner;

impl Partitioner for SipPartitioner {
    fn position(&self, key: &[u8]) -> u64 {
        let mut hasher = SipHasher13::new();
        hasher.write(key);
        hasher.finish()
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
