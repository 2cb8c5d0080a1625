//! Routing strategies for the cache demos.
//!
//! This crate provides pluggable strategies that decide which node owns a
//! key:
//! - `RingTopology` (consistent hashing with replica slots)
//! - `ModuloHash` (`hash(key) mod node_count`, the comparison baseline)
//!
//! and a small harness measuring how many keys change owner when the
//! topology changes.

pub mod disruption;
pub mod strategy;

pub use disruption::{DisruptionReport, owners};
pub use strategy::{ModuloHash, RoutingStrategy};

pub use corelib::{Error, NodeId, Result, RingTopology};
