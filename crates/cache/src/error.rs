use corelib::NodeId;
use thiserror::Error;

/// Boxed error returned by a data source fetch.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error type for [`CacheSimulation`](crate::CacheSimulation) operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The routing strategy could not place the key (no nodes registered).
    #[error("routing: {0}")]
    Routing(#[from] corelib::Error),
    /// The strategy routed to a node the simulation does not hold.
    #[error("key `{key}` routed to unknown node `{node}`")]
    UnknownNode { key: String, node: NodeId },
    /// The data source fetch failed; nothing was cached.
    #[error("fetching `{key}` from the data source failed")]
    Fetch {
        key: String,
        #[source]
        source: BoxError,
    },
}
