//! Consistent hash ring implementation.
//!
//! The ring manages replica slot positions and resolves a key to the node
//! owning the first slot at or after the key's position, wrapping around.

pub mod config;
pub mod topology;

pub use config::{RingBuilder, RingConfig};
pub use topology::RingTopology;

/// Default number of positions on the ring.
pub const DEFAULT_MAX_SLOTS: u64 = 1000;

/// Default number of replica slots per node.
pub const DEFAULT_REPLICATION_FACTOR: usize = 16;
