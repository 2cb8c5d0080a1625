//! A single simulated cache node.

use std::collections::HashMap;
use std::future::Future;

use corelib::NodeId;

use crate::error::BoxError;
use crate::stats::{NodeStats, StatsRow};

/// One cache server: private storage plus counters.
#[derive(Debug, Clone)]
pub struct CacheNode<V> {
    /// The node's identifier, as registered with the routing strategy.
    pub id: NodeId,
    storage: HashMap<String, V>,
    stats: NodeStats,
}

impl<V: Clone> CacheNode<V> {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            storage: HashMap::new(),
            stats: NodeStats::default(),
        }
    }

    /// Return the stored value for `key`, or fetch and store it.
    ///
    /// The boolean is `true` for a hit. On a failed fetch nothing is stored
    /// and no counter moves.
    pub async fn get_or_fetch<F, Fut, E>(
        &mut self,
        key: &str,
        fetch: F,
    ) -> Result<(V, bool), BoxError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Into<BoxError>,
    {
        if let Some(value) = self.storage.get(key) {
            self.stats.hits += 1;
            return Ok((value.clone(), true));
        }

        let value = fetch().await.map_err(Into::into)?;
        self.storage.insert(key.to_owned(), value.clone());
        self.stats.keys += 1;
        self.stats.misses += 1;
        Ok((value, false))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.storage.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.storage.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    pub(crate) fn row(&self) -> StatsRow {
        StatsRow::new(self.id.to_string(), self.stats.keys, self.stats.hits, self.stats.misses)
    }
}
