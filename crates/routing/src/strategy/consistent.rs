//! Consistent hashing strategy.
//!
//! Delegates to [`RingTopology`]: a key belongs to the first replica slot at
//! or after its position, wrapping around the ring.
//!
//! # Performance
//!
//! - **Lookup**: O(log s) binary search over s = nodes * replicas slots
//! - **Join/Leave**: O(s log s) (re-sort after inserting a node's slots)

use crate::strategy::RoutingStrategy;
use corelib::{KeyHasher, NodeId, Result, RingTopology};

impl<H: KeyHasher> RoutingStrategy for RingTopology<H> {
    fn add_node(&mut self, node: NodeId) -> bool {
        RingTopology::<H>::add_node(self, node)
    }

    fn remove_node(&mut self, node: &NodeId) -> bool {
        RingTopology::<H>::remove_node(self, node)
    }

    fn node_for_key(&self, key: &str) -> Result<NodeId> {
        RingTopology::<H>::node_for_key(self, key)
    }

    fn reset(&mut self) {
        RingTopology::<H>::reset(self)
    }

    fn nodes(&self) -> Vec<NodeId> {
        RingTopology::<H>::nodes(self).to_vec()
    }

    fn name(&self) -> &'static str {
        "ConsistentHash"
    }
}
