//! In-memory cache simulation over a pluggable routing strategy.
//!
//! Every node holds its own key/value storage and hit/miss counters. Keys
//! are routed by a [`routing::RoutingStrategy`]; when the topology changes,
//! keys that now route to a different node miss and are fetched again. A
//! removed node's storage is dropped, not migrated.

mod error;
pub use self::error::{BoxError, CacheError, Result};

pub mod node;
pub use self::node::CacheNode;

pub mod simulation;
pub use self::simulation::{CacheLookup, CacheSimulation};

pub mod stats;
pub use self::stats::{Counters, StatsReport, StatsRow};
