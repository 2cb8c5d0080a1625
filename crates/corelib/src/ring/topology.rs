//! Ring topology: sorted replica slots and successor lookup.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::hash::{KeyHasher, SipKeyHasher};
use crate::node::NodeId;
use crate::ring::config::RingConfig;
use crate::slot::ReplicaSlot;

/// Consistent hash ring over the modular space `[0, max_slots)`.
///
/// Slots are kept sorted ascending by position. Equal positions keep their
/// insertion order (the sort is stable), so a lookup that lands on a collision
/// resolves to the slot that was inserted first.
///
/// Adding or removing a node touches all of its slots in one call; no
/// partially registered node is ever observable.
#[derive(Debug, Clone)]
pub struct RingTopology<H: KeyHasher = SipKeyHasher> {
    config: RingConfig,
    hasher: H,
    slots: Vec<ReplicaSlot>,
    nodes: Vec<NodeId>,
}

impl RingTopology<SipKeyHasher> {
    /// Empty ring with the default configuration (1000 slots, 16 replicas).
    pub fn new() -> Self {
        Self {
            config: RingConfig::default(),
            hasher: SipKeyHasher,
            slots: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

impl Default for RingTopology<SipKeyHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: KeyHasher> RingTopology<H> {
    pub fn with_config(config: RingConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hasher,
            slots: Vec::new(),
            nodes: Vec::new(),
        })
    }

    /// Register `node` with `replication_factor` slots.
    ///
    /// Returns `false` and leaves the ring untouched if the node is already
    /// registered.
    pub fn add_node(&mut self, node: impl Into<NodeId>) -> bool {
        let node = node.into();
        if self.contains_node(&node) {
            warn!(node = %node, "node already on the ring, ignoring add");
            return false;
        }

        debug!(node = %node, replicas = self.config.replication_factor, "adding node");
        for replica in 1..=self.config.replication_factor {
            let slot = ReplicaSlot::place(&node, replica, self.config.max_slots, &self.hasher);
            self.slots.push(slot);
        }
        self.slots.sort_by_key(|slot| slot.position);
        self.nodes.push(node);
        true
    }

    /// Remove every slot owned by `node`. Returns `false` if it was absent.
    pub fn remove_node(&mut self, node: &NodeId) -> bool {
        let Some(index) = self.nodes.iter().position(|n| n == node) else {
            debug!(node = %node, "node not on the ring, nothing to remove");
            return false;
        };

        debug!(node = %node, "removing node");
        self.nodes.remove(index);
        self.slots.retain(|slot| &slot.owner != node);
        true
    }

    /// Position of `key` on the ring.
    pub fn position_for(&self, key: &str) -> u64 {
        self.hasher.hash(key) % self.config.max_slots
    }

    /// First slot whose position is `>= position`, wrapping to the first slot.
    ///
    /// `None` only when the ring is empty.
    pub fn owner_of_position(&self, position: u64) -> Option<&ReplicaSlot> {
        let index = self.slots.partition_point(|slot| slot.position < position);
        self.slots.get(index).or_else(|| self.slots.first())
    }

    /// Slot responsible for `key`.
    pub fn slot_for_key(&self, key: &str) -> Result<&ReplicaSlot> {
        self.owner_of_position(self.position_for(key))
            .ok_or_else(|| Error::empty_topology(key))
    }

    /// Node responsible for `key`.
    ///
    /// Fails with [`Error::EmptyTopology`] if no node is registered.
    pub fn node_for_key(&self, key: &str) -> Result<NodeId> {
        self.slot_for_key(key).map(|slot| slot.owner.clone())
    }

    /// Drop all slots and nodes.
    pub fn reset(&mut self) {
        debug!(slots = self.slots.len(), "resetting ring");
        self.slots.clear();
        self.nodes.clear();
    }

    /// Number of ring positions each node owns under the successor rule.
    ///
    /// A slot owns the half-open arc `(previous.position, slot.position]`; the
    /// first slot also owns the wrap-around arc past the last slot. The counts
    /// sum to `max_slots` whenever the ring is non-empty.
    pub fn ownership(&self) -> BTreeMap<NodeId, u64> {
        let mut owned: BTreeMap<NodeId, u64> =
            self.nodes.iter().map(|node| (node.clone(), 0)).collect();

        let (Some(first), Some(last)) = (self.slots.first(), self.slots.last()) else {
            return owned;
        };

        let wrap = self.config.max_slots - last.position + first.position;
        *owned.entry(first.owner.clone()).or_default() += wrap;

        for pair in self.slots.windows(2) {
            let arc = pair[1].position - pair[0].position;
            *owned.entry(pair[1].owner.clone()).or_default() += arc;
        }
        owned
    }

    /// Slots sorted by position.
    pub fn slots(&self) -> &[ReplicaSlot] {
        &self.slots
    }

    /// Registered nodes in join order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn contains_node(&self, node: &NodeId) -> bool {
        self.nodes.contains(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn hasher_name(&self) -> &'static str {
        self.hasher.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hashes `"<name>-<n>"` to `n * 100` and any other text to its parsed
    /// value, so positions can be chosen by hand.
    #[derive(Clone)]
    struct FixedHasher;

    impl KeyHasher for FixedHasher {
        fn hash(&self, text: &str) -> u64 {
            match text.rsplit_once('-') {
                Some((_, replica)) => replica.parse::<u64>().unwrap() * 100,
                None => text.parse().unwrap(),
            }
        }

        fn name(&self) -> &'static str {
            "FixedHasher"
        }
    }

    fn fixed_ring(replication_factor: usize) -> RingTopology<FixedHasher> {
        let config = RingConfig {
            max_slots: 1000,
            replication_factor,
        };
        RingTopology::with_config(config, FixedHasher).unwrap()
    }

    #[test]
    fn test_successor_and_wrap() {
        let mut ring = fixed_ring(3); // slots at 100, 200, 300
        ring.add_node("A");

        assert_eq!(ring.owner_of_position(50).unwrap().position, 100);
        assert_eq!(ring.owner_of_position(100).unwrap().position, 100);
        assert_eq!(ring.owner_of_position(101).unwrap().position, 200);
        assert_eq!(ring.owner_of_position(300).unwrap().position, 300);
        // Past the last slot wraps to the first one.
        assert_eq!(ring.owner_of_position(301).unwrap().position, 100);
        assert_eq!(ring.owner_of_position(999).unwrap().position, 100);
    }

    #[test]
    fn test_collisions_keep_insertion_order() {
        let mut ring = fixed_ring(2);
        ring.add_node("A");
        ring.add_node("B"); // same positions as A

        let owners: Vec<&str> = ring.slots().iter().map(|s| s.owner.as_str()).collect();
        assert_eq!(owners, vec!["A", "B", "A", "B"]);
        assert_eq!(ring.node_for_key("150").unwrap(), NodeId::from("A"));
        assert_eq!(ring.node_for_key("200").unwrap(), NodeId::from("A"));
    }

    #[test]
    fn test_binary_search_matches_linear_scan() {
        let mut ring = RingTopology::new();
        for node in ["S1", "S2", "S3", "S4"] {
            ring.add_node(node);
        }

        for position in 0..ring.config().max_slots {
            let linear = ring
                .slots()
                .iter()
                .find(|slot| slot.position >= position)
                .or_else(|| ring.slots().first());
            assert_eq!(ring.owner_of_position(position), linear);
        }
    }

    #[test]
    fn test_ownership_sums_to_ring_size() {
        let mut ring = RingTopology::new();
        assert!(ring.ownership().is_empty());

        ring.add_node("S1");
        assert_eq!(ring.ownership()[&NodeId::from("S1")], 1000);

        ring.add_node("S2");
        ring.add_node("S3");
        let total: u64 = ring.ownership().values().sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn test_ownership_with_fixed_positions() {
        let mut ring = fixed_ring(3); // A at 100, 200, 300
        ring.add_node("A");
        assert_eq!(ring.ownership()[&NodeId::from("A")], 1000);
        // Arc of the slot at 100 covers 0..=100 plus 301..1000.
        assert_eq!(ring.slots()[0].distance_to(&ring.slots()[1], 1000), 100);
    }

    #[test]
    fn test_ownership_on_full_width_ring() {
        let config = RingConfig {
            max_slots: u64::MAX,
            replication_factor: 3,
        };
        let mut ring = RingTopology::with_config(config, FixedHasher).unwrap();
        ring.add_node("A");
        assert_eq!(ring.ownership()[&NodeId::from("A")], u64::MAX);

        ring.add_node("B");
        let owned = ring.ownership();
        let total: u128 = owned.values().map(|&n| u128::from(n)).sum();
        assert_eq!(total, u128::from(u64::MAX));
        assert_eq!(owned[&NodeId::from("B")], 0);
    }

    #[test]
    fn test_duplicate_add_is_ignored() {
        let mut ring = RingTopology::new();
        assert!(ring.add_node("S1"));
        assert!(!ring.add_node("S1"));
        assert_eq!(ring.slot_count(), 16);
        assert_eq!(ring.node_count(), 1);
    }

    #[test]
    fn test_empty_ring_fails_loudly() {
        let ring = RingTopology::new();
        assert_eq!(
            ring.node_for_key("k"),
            Err(Error::EmptyTopology { key: "k".into() })
        );
    }
}
