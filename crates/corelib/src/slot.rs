//! Replica slots.
//!
//! # Replicas (Virtual Nodes)
//!
//! Each physical node is placed on the ring several times. Every placement is
//! a [`ReplicaSlot`] at `hash("<node>-<replica>") mod max_slots`. Spreading a
//! node over many positions gives:
//!
//! 1. **Better Load Distribution**: each node owns many small arcs instead of
//!    one large one
//! 2. **Gradual Rebalancing**: when a node joins or leaves, only the keys on
//!    its own arcs move
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(r) per node where r = replication factor
//! - **Lookup**: O(log s) where s = total slots on the ring

use crate::hash::KeyHasher;
use crate::node::NodeId;

/// One position on the ring owned by a physical node.
///
/// # Invariants
///
/// - `position < max_slots` of the ring that created it
/// - `replica` is 1-based (`1..=replication_factor`)
///
/// Two slots may share a position when hashes collide. The ring keeps them in
/// insertion order, so the earlier one wins lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplicaSlot {
    /// The physical node that owns this slot.
    pub owner: NodeId,
    /// Position in `[0, max_slots)`.
    pub position: u64,
    /// Which replica of `owner` this slot is.
    pub replica: usize,
}

impl ReplicaSlot {
    #[inline]
    pub fn new(owner: NodeId, position: u64, replica: usize) -> Self {
        Self {
            owner,
            position,
            replica,
        }
    }

    /// Create the slot for replica `replica` of `owner`.
    ///
    /// # Algorithm
    ///
    /// 1. Format the replica key `"<owner>-<replica>"`
    /// 2. Hash it
    /// 3. Reduce modulo `max_slots`
    pub fn place<H: KeyHasher>(owner: &NodeId, replica: usize, max_slots: u64, hasher: &H) -> Self {
        let position = hasher.hash(&owner.replica_key(replica)) % max_slots;
        Self::new(owner.clone(), position, replica)
    }

    /// Clockwise distance from this slot to `other` on a ring of `max_slots`.
    #[inline]
    pub fn distance_to(&self, other: &Self, max_slots: u64) -> u64 {
        if other.position >= self.position {
            other.position - self.position
        } else {
            max_slots - self.position + other.position
        }
    }
}

impl std::fmt::Display for ReplicaSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot(pos={}, node={}#{})", self.position, self.owner, self.replica)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::SipKeyHasher;

    #[test]
    fn test_slot_creation() {
        let slot = ReplicaSlot::new(NodeId::from("S1"), 100, 1);
        assert_eq!(slot.position, 100);
        assert_eq!(slot.owner, NodeId::from("S1"));
    }

    #[test]
    fn test_place_uses_replica_key() {
        let hasher = SipKeyHasher;
        let node = NodeId::from("S1");
        let slot = ReplicaSlot::place(&node, 3, 1000, &hasher);
        assert_eq!(slot.position, hasher.hash("S1-3") % 1000);
        assert_eq!(slot.replica, 3);
    }

    #[test]
    fn test_place_stays_in_range() {
        let node = NodeId::from("S1");
        for replica in 1..=64 {
            let slot = ReplicaSlot::place(&node, replica, 7, &SipKeyHasher);
            assert!(slot.position < 7);
        }
    }

    #[test]
    fn test_slot_distance_wraps() {
        let a = ReplicaSlot::new(NodeId::from("A"), 900, 1);
        let b = ReplicaSlot::new(NodeId::from("B"), 100, 1);
        assert_eq!(b.distance_to(&a, 1000), 800);
        assert_eq!(a.distance_to(&b, 1000), 200);
    }
}
