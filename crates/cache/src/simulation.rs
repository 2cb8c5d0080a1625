//! Multi-node cache simulation.

use std::collections::BTreeMap;
use std::future::Future;

use corelib::NodeId;
use routing::RoutingStrategy;
use tracing::{debug, warn};

use crate::error::{BoxError, CacheError, Result};
use crate::node::CacheNode;
use crate::stats::{Counters, StatsReport};

/// Outcome of a [`CacheSimulation::get_or_fetch_detailed`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLookup<V> {
    pub value: V,
    /// Node that served the key.
    pub node: NodeId,
    /// `true` for a hit, `false` when the value came from the data source.
    pub cached: bool,
}

/// A set of cache nodes fronted by a routing strategy.
///
/// The simulation owns its nodes exclusively: `add_node` creates one with
/// empty storage, `remove_node` drops it together with everything it
/// stored. Keys are never migrated, so a topology change shows up as misses
/// on the keys that now route elsewhere.
pub struct CacheSimulation<S, V = String> {
    strategy: S,
    nodes: BTreeMap<NodeId, CacheNode<V>>,
    lifetime: Counters,
}

impl<S: RoutingStrategy, V: Clone> CacheSimulation<S, V> {
    /// New simulation routing with `strategy`.
    ///
    /// The strategy should start empty; nodes it already knows have no
    /// storage here and route to [`CacheError::UnknownNode`].
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            nodes: BTreeMap::new(),
            lifetime: Counters::default(),
        }
    }

    /// Create node `id` and register it with the strategy.
    ///
    /// Returns `false` if the node already exists; its storage is kept.
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> bool {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            warn!(node = %id, "cache node already exists, ignoring add");
            return false;
        }
        debug!(node = %id, strategy = self.strategy.name(), "adding cache node");
        self.nodes.insert(id.clone(), CacheNode::new(id.clone()));
        self.strategy.add_node(id);
        true
    }

    /// Drop node `id` and its storage. Returns `false` if it did not exist.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        let Some(node) = self.nodes.remove(id) else {
            debug!(node = %id, "cache node not found, nothing to remove");
            return false;
        };
        debug!(node = %id, dropped_keys = node.len(), "removing cache node");
        self.strategy.remove_node(id);
        true
    }

    /// Return the cached value for `key`, fetching it on a miss.
    pub async fn get_or_fetch<F, Fut, E>(&mut self, key: &str, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: Into<BoxError>,
    {
        self.get_or_fetch_detailed(key, fetch)
            .await
            .map(|lookup| lookup.value)
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch), also reporting which node
    /// served the key and whether it was a hit.
    ///
    /// Routing errors and fetch failures propagate; a failed fetch caches
    /// nothing and leaves every counter unchanged.
    pub async fn get_or_fetch_detailed<F, Fut, E>(
        &mut self,
        key: &str,
        fetch: F,
    ) -> Result<CacheLookup<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: Into<BoxError>,
    {
        let node_id = self.strategy.node_for_key(key)?;
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or_else(|| CacheError::UnknownNode {
                key: key.to_owned(),
                node: node_id.clone(),
            })?;

        let (value, cached) = node
            .get_or_fetch(key, fetch)
            .await
            .map_err(|source| CacheError::Fetch {
                key: key.to_owned(),
                source,
            })?;

        let label = node_id.to_string();
        if cached {
            self.lifetime.hits += 1;
            metrics::counter!("cache_hits_total", "node" => label).increment(1);
        } else {
            self.lifetime.misses += 1;
            metrics::counter!("cache_misses_total", "node" => label).increment(1);
        }
        debug!(key, node = %node_id, cached, "get");

        Ok(CacheLookup {
            value,
            node: node_id,
            cached,
        })
    }

    /// Drop every node and counter and reset the strategy.
    pub fn reset(&mut self) {
        debug!(nodes = self.nodes.len(), "resetting cache simulation");
        self.nodes.clear();
        self.lifetime = Counters::default();
        self.strategy.reset();
    }

    /// Per-node rows, an `Overall` row and lifetime counters.
    pub fn stats(&self) -> StatsReport {
        let rows = self.nodes.values().map(CacheNode::row).collect();
        StatsReport::from_rows(rows, self.lifetime)
    }

    pub fn node(&self, id: &NodeId) -> Option<&CacheNode<V>> {
        self.nodes.get(id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}
