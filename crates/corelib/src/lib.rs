//! Core library for consistent hashing.
//!
//! This crate provides the fundamental abstractions for the routing demos:
//! - Hash primitive (string to `u64`)
//! - Node identifiers and replica slots
//! - Ring topology: slot placement, successor lookup, join/leave

pub mod error;
pub mod hash;
pub mod node;
pub mod ring;
pub mod slot;

pub use error::{Error, Result};
pub use hash::{HasherKind, KeyHasher};
pub use node::NodeId;
pub use ring::{RingBuilder, RingConfig, RingTopology};
pub use slot::ReplicaSlot;
