//! Consistent hash ring implementation.
//!
//! The ring maps `u64` positions to owning nodes. Each node is placed at
//! multiple positions (virtual nodes) derived from its label, so that
//! membership changes remap only the keys on the affected arcs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::partitioner::{Partitioner, Xxh3Partitioner};

/// Default number of virtual nodes per node.
///
/// Kept deliberately small; production rings typically use 100+ to tighten
/// the distribution (see [`HashRing::stats`]).
pub const DEFAULT_VNODES: u32 = 3;

/// Mutable ring state, guarded by one lock so the sorted position set and
/// the membership set can never disagree.
pub(crate) struct RingState {
    /// Virtual node positions: ring position -> owning node label.
    pub(crate) positions: BTreeMap<u64, String>,
    /// Labels of current members.
    pub(crate) nodes: HashSet<String>,
}

impl RingState {
    /// Owner of the arc containing `pos`: the smallest position >= `pos`,
    /// wrapping around to the smallest position overall.
    pub(crate) fn owner(&self, pos: u64) -> Option<&String> {
        self.positions
            .range(pos..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(_, node)| node)
    }
}

/// A consistent hash ring mapping string keys to named nodes.
///
/// Nodes are opaque string labels. Adding a node inserts `vnodes` positions
/// hashed from `"{node}#{i}"`; removing it recomputes and deletes exactly
/// those positions, so only the keys it owned are remapped.
///
/// Distinct virtual-node labels are assumed not to collide at 64-bit hash
/// width. If a collision does occur the later insertion overwrites the
/// earlier position mapping (last insert wins).
///
/// # Concurrency
///
/// State lives behind a reader-writer lock: lookups take the read lock,
/// `add_node`/`remove_node` the write lock. Batch operations
/// ([`distribute_keys`](Self::distribute_keys), [`stats`](Self::stats))
/// hold a single read guard so the whole batch sees one ring snapshot.
pub struct HashRing {
    state: RwLock<RingState>,
    vnodes: u32,
    partitioner: Arc<dyn Partitioner>,
}

impl HashRing {
    /// Create an empty ring with the given virtual-node count and the
    /// default partitioner.
    ///
    /// Returns [`Error::InvalidConfig`] if `vnodes` is zero (every add
    /// would be a no-op).
    pub fn new(vnodes: u32) -> Result<Self> {
        Self::with_partitioner(vnodes, Arc::new(Xxh3Partitioner))
    }

    /// Create an empty ring with an explicit partitioner.
    pub fn with_partitioner(vnodes: u32, partitioner: Arc<dyn Partitioner>) -> Result<Self> {
        if vnodes == 0 {
            return Err(Error::InvalidConfig(
                "virtual node count must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            state: RwLock::new(RingState {
                positions: BTreeMap::new(),
                nodes: HashSet::new(),
            }),
            vnodes,
            partitioner,
        })
    }

    /// Add a node to the ring.
    ///
    /// Inserts `vnodes` positions derived from the node's label. Constraint
    /// checks happen before any insertion, so a rejected call changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNode`] for an empty label, [`Error::DuplicateNode`]
    /// if the node is already a member.
    pub fn add_node(&self, node: &str) -> Result<()> {
        if node.is_empty() {
            return Err(Error::InvalidNode("empty node label".to_string()));
        }

        let mut state = self.state.write();
        if !state.nodes.insert(node.to_string()) {
            return Err(Error::DuplicateNode(node.to_string()));
        }

        for i in 0..self.vnodes {
            let pos = self.partitioner.position(vnode_key(node, i).as_bytes());
            state.positions.insert(pos, node.to_string());
        }

        debug!(
            node,
            vnodes = self.vnodes,
            positions = state.positions.len(),
            "added node to ring"
        );
        Ok(())
    }

    /// Remove a node from the ring.
    ///
    /// Recomputes the node's positions from its label and deletes exactly
    /// those; no other node's positions are touched. Removing an absent
    /// node is a no-op. Returns whether the node was a member.
    pub fn remove_node(&self, node: &str) -> bool {
        let mut state = self.state.write();
        if !state.nodes.remove(node) {
            return false;
        }

        for i in 0..self.vnodes {
            let pos = self.partitioner.position(vnode_key(node, i).as_bytes());
            state.positions.remove(&pos);
        }

        debug!(
            node,
            positions = state.positions.len(),
            "removed node from ring"
        );
        true
    }

    /// Find the node responsible for `key`.
    ///
    /// Hashes the key and returns the owner of the smallest ring position
    /// >= that hash (inclusive boundary), wrapping around to the smallest
    /// position when the hash exceeds every position.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no nodes are present.
    pub fn get_node(&self, key: &str) -> Result<String> {
        let state = self.state.read();
        let pos = self.partitioner.position(key.as_bytes());
        state.owner(pos).cloned().ok_or(Error::EmptyRing)
    }

    /// Find the first `count` distinct nodes clockwise from `key`'s
    /// position, primary first.
    ///
    /// Returns at most `node_count` entries when fewer distinct nodes
    /// exist than requested.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no nodes are present.
    pub fn get_nodes(&self, key: &str, count: usize) -> Result<Vec<String>> {
        let state = self.state.read();
        if state.nodes.is_empty() {
            return Err(Error::EmptyRing);
        }

        let pos = self.partitioner.position(key.as_bytes());
        let want = count.min(state.nodes.len());
        let mut owners: Vec<String> = Vec::with_capacity(want);

        // Walk clockwise from the key's position, then wrap.
        let after = state.positions.range(pos..);
        let before = state.positions.range(..pos);
        for (_, node) in after.chain(before) {
            if !owners.iter().any(|n| n == node) {
                owners.push(node.clone());
                if owners.len() == want {
                    break;
                }
            }
        }

        Ok(owners)
    }

    /// Group `keys` by their owning node.
    ///
    /// Calls [`get_node`](Self::get_node) logic once per key under a single
    /// read guard, so the whole batch observes one consistent ring state.
    /// Each node's key list preserves the input order of its keys.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no nodes are present.
    pub fn distribute_keys<I, K>(&self, keys: I) -> Result<HashMap<String, Vec<String>>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let state = self.state.read();
        if state.nodes.is_empty() {
            return Err(Error::EmptyRing);
        }

        let mut distribution: HashMap<String, Vec<String>> = HashMap::new();
        for key in keys {
            let key = key.as_ref();
            let pos = self.partitioner.position(key.as_bytes());
            if let Some(owner) = state.owner(pos) {
                distribution
                    .entry(owner.clone())
                    .or_default()
                    .push(key.to_string());
            }
        }

        Ok(distribution)
    }

    /// Number of nodes in the ring.
    pub fn node_count(&self) -> usize {
        self.state.read().nodes.len()
    }

    /// Number of positions (virtual nodes) on the ring.
    pub fn position_count(&self) -> usize {
        self.state.read().positions.len()
    }

    /// True if the ring has no nodes.
    pub fn is_empty(&self) -> bool {
        self.state.read().nodes.is_empty()
    }

    /// True if `node` is a member of the ring.
    pub fn contains_node(&self, node: &str) -> bool {
        self.state.read().nodes.contains(node)
    }

    /// Labels of all current members, sorted for stable output.
    pub fn nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self.state.read().nodes.iter().cloned().collect();
        nodes.sort();
        nodes
    }

    /// Virtual nodes placed per node.
    pub fn vnodes_per_node(&self) -> u32 {
        self.vnodes
    }

    /// Name of the configured partitioner.
    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    pub(crate) fn partitioner(&self) -> &Arc<dyn Partitioner> {
        &self.partitioner
    }

    pub(crate) fn read_state(&self) -> parking_lot::RwLockReadGuard<'_, RingState> {
        self.state.read()
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("nodes", &state.nodes.len())
            .field("positions", &state.positions.len())
            .field("vnodes", &self.vnodes)
            .field("partitioner", &self.partitioner.name())
            .finish()
    }
}

/// Hashing input for a node's `index`-th virtual node.
fn vnode_key(node: &str, index: u32) -> String {
    format!("{}#{}", node, index)
}

/// Builder for [`HashRing`].
///
/// ```
/// use hashring::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_vnodes(8)
///     .add_node("node1")
///     .add_node("node2")
///     .build()?;
/// assert_eq!(ring.node_count(), 2);
/// # Ok::<(), hashring::Error>(())
/// ```
pub struct RingBuilder {
    vnodes: u32,
    partitioner: Arc<dyn Partitioner>,
    nodes: Vec<String>,
}

impl RingBuilder {
    /// Start a builder with the default vnode count and partitioner.
    pub fn new() -> Self {
        Self {
            vnodes: DEFAULT_VNODES,
            partitioner: Arc::new(Xxh3Partitioner),
            nodes: Vec::new(),
        }
    }

    /// Set the virtual-node count per node.
    pub fn with_vnodes(mut self, vnodes: u32) -> Self {
        self.vnodes = vnodes;
        self
    }

    /// Set the partitioner.
    pub fn with_partitioner(mut self, partitioner: Arc<dyn Partitioner>) -> Self {
        self.partitioner = partitioner;
        self
    }

    /// Queue a node for insertion at build time.
    pub fn add_node(mut self, node: impl Into<String>) -> Self {
        self.nodes.push(node.into());
        self
    }

    /// Queue several nodes for insertion at build time.
    pub fn add_nodes<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Build the ring, adding all queued nodes.
    ///
    /// Fails with the same errors as [`HashRing::new`] and
    /// [`HashRing::add_node`].
    pub fn build(self) -> Result<HashRing> {
        let ring = HashRing::with_partitioner(self.vnodes, self.partitioner)?;
        for node in &self.nodes {
            ring.add_node(node)?;
        }
        Ok(ring)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
