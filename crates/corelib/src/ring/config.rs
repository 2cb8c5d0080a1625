//! Ring configuration and builder.

use crate::error::{Error, Result};
use crate::hash::{KeyHasher, SipKeyHasher};
use crate::node::NodeId;
use crate::ring::topology::RingTopology;
use crate::ring::{DEFAULT_MAX_SLOTS, DEFAULT_REPLICATION_FACTOR};

/// Size of the ring and how many slots each node gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingConfig {
    /// Positions on the ring are `0..max_slots`.
    pub max_slots: u64,
    /// Replica slots created per node.
    pub replication_factor: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            max_slots: DEFAULT_MAX_SLOTS,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_slots == 0 {
            return Err(Error::InvalidConfig("max_slots must be at least 1".into()));
        }
        if self.replication_factor == 0 {
            return Err(Error::InvalidConfig(
                "replication_factor must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for a [`RingTopology`].
///
/// ```rust
/// use corelib::ring::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_replication_factor(8)
///     .add_node("S1")
///     .add_node("S2")
///     .build()
///     .unwrap();
/// assert_eq!(ring.slot_count(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<H: KeyHasher = SipKeyHasher> {
    config: RingConfig,
    hasher: H,
    nodes: Vec<NodeId>,
}

impl RingBuilder<SipKeyHasher> {
    pub fn new() -> Self {
        Self {
            config: RingConfig::default(),
            hasher: SipKeyHasher,
            nodes: Vec::new(),
        }
    }
}

impl Default for RingBuilder<SipKeyHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: KeyHasher> RingBuilder<H> {
    pub fn with_max_slots(mut self, max_slots: u64) -> Self {
        self.config.max_slots = max_slots;
        self
    }

    pub fn with_replication_factor(mut self, replication_factor: usize) -> Self {
        self.config.replication_factor = replication_factor;
        self
    }

    pub fn with_config(mut self, config: RingConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the hasher used for both node and key positions.
    pub fn with_hasher<H2: KeyHasher>(self, hasher: H2) -> RingBuilder<H2> {
        RingBuilder {
            config: self.config,
            hasher,
            nodes: self.nodes,
        }
    }

    pub fn add_node(mut self, node: impl Into<NodeId>) -> Self {
        self.nodes.push(node.into());
        self
    }

    /// Validate the configuration and register every queued node in order.
    pub fn build(self) -> Result<RingTopology<H>> {
        let mut ring = RingTopology::with_config(self.config, self.hasher)?;
        for node in self.nodes {
            ring.add_node(node);
        }
        Ok(ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RingConfig::default();
        assert_eq!(config.max_slots, 1000);
        assert_eq!(config.replication_factor, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_sizes() {
        let err = RingBuilder::new().with_max_slots(0).build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = RingBuilder::new()
            .with_replication_factor(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
