//! Routing strategy abstractions.
//!
//! A routing strategy decides which node owns a key. Callers (the cache
//! simulation, the comparison harness) only talk to [`RoutingStrategy`], so
//! strategies can be swapped without touching them:
//!
//! - **RingTopology**: consistent hashing, a join/leave only moves the keys on
//!   the affected arcs
//! - **ModuloHash**: `hash(key) mod n`, a join/leave reshuffles most keys

pub mod consistent;
pub mod modulo;

pub use modulo::ModuloHash;

use corelib::{NodeId, Result};

/// Trait for routing strategies.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as the cache simulation
/// may be shared behind a lock across tasks.
pub trait RoutingStrategy: Send + Sync + 'static {
    /// Register a node.
    ///
    /// # Returns
    /// `false` if the node was already registered (nothing changes).
    fn add_node(&mut self, node: NodeId) -> bool;

    /// Unregister a node.
    ///
    /// # Returns
    /// `false` if the node was not registered. Removing an unknown node is a
    /// no-op, not an error.
    fn remove_node(&mut self, node: &NodeId) -> bool;

    /// Find the node that owns `key`.
    ///
    /// # Errors
    /// [`corelib::Error::EmptyTopology`] when no node is registered.
    fn node_for_key(&self, key: &str) -> Result<NodeId>;

    /// Forget every node.
    fn reset(&mut self);

    /// Registered nodes in join order.
    fn nodes(&self) -> Vec<NodeId>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}

impl<S: RoutingStrategy + ?Sized> RoutingStrategy for Box<S> {
    fn add_node(&mut self, node: NodeId) -> bool {
        (**self).add_node(node)
    }

    fn remove_node(&mut self, node: &NodeId) -> bool {
        (**self).remove_node(node)
    }

    fn node_for_key(&self, key: &str) -> Result<NodeId> {
        (**self).node_for_key(key)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn nodes(&self) -> Vec<NodeId> {
        (**self).nodes()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
