//! Modulo hashing strategy.
//!
//! `node = nodes[hash(key) mod nodes.len()]`. Cheap and perfectly balanced
//! for a fixed node list, but any join or leave changes `nodes.len()` and
//! therefore the owner of most keys. It exists as the baseline the ring is
//! compared against.

use crate::strategy::RoutingStrategy;
use corelib::hash::SipKeyHasher;
use corelib::{Error, KeyHasher, NodeId, Result};
use tracing::{debug, warn};

/// Modulo hashing over an ordered node list.
#[derive(Debug, Clone, Default)]
pub struct ModuloHash<H: KeyHasher = SipKeyHasher> {
    nodes: Vec<NodeId>,
    hasher: H,
}

impl ModuloHash<SipKeyHasher> {
    pub fn new() -> Self {
        Self::with_hasher(SipKeyHasher)
    }
}

impl<H: KeyHasher> ModuloHash<H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            nodes: Vec::new(),
            hasher,
        }
    }

    /// Index into the node list that `key` maps to.
    pub fn index_for(&self, key: &str) -> Result<usize> {
        if self.nodes.is_empty() {
            return Err(Error::empty_topology(key));
        }
        Ok((self.hasher.hash(key) % self.nodes.len() as u64) as usize)
    }
}

impl<H: KeyHasher> RoutingStrategy for ModuloHash<H> {
    fn add_node(&mut self, node: NodeId) -> bool {
        if self.nodes.contains(&node) {
            warn!(node = %node, "node already registered, ignoring add");
            return false;
        }
        debug!(node = %node, index = self.nodes.len(), "adding node");
        self.nodes.push(node);
        true
    }

    fn remove_node(&mut self, node: &NodeId) -> bool {
        match self.nodes.iter().position(|n| n == node) {
            Some(index) => {
                debug!(node = %node, index, "removing node");
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    fn node_for_key(&self, key: &str) -> Result<NodeId> {
        let index = self.index_for(key)?;
        Ok(self.nodes[index].clone())
    }

    fn reset(&mut self) {
        self.nodes.clear();
    }

    fn nodes(&self) -> Vec<NodeId> {
        self.nodes.clone()
    }

    fn name(&self) -> &'static str {
        "ModuloHash"
    }
}
