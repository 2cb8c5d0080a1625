//! Measuring how much a topology change disturbs routing.
//!
//! Route a key sample, apply a join or leave, route the sample again and
//! count the keys whose owner changed. Under a ring only the keys on the
//! affected arcs move; under modulo hashing most of the sample moves.

use crate::strategy::RoutingStrategy;
use corelib::{NodeId, Result};

/// Owner of each key, in order.
pub fn owners<S, K>(strategy: &S, keys: &[K]) -> Result<Vec<NodeId>>
where
    S: RoutingStrategy + ?Sized,
    K: AsRef<str>,
{
    keys.iter()
        .map(|key| strategy.node_for_key(key.as_ref()))
        .collect()
}

/// Outcome of one topology change over a key sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisruptionReport {
    /// Keys routed before and after the change.
    pub total: usize,
    /// Keys whose owner differs after the change.
    pub moved: usize,
}

impl DisruptionReport {
    /// Compare two owner lists of the same key sample.
    pub fn compare(before: &[NodeId], after: &[NodeId]) -> Self {
        let moved = before
            .iter()
            .zip(after)
            .filter(|(old, new)| old != new)
            .count();
        Self {
            total: before.len().min(after.len()),
            moved,
        }
    }

    /// Fraction of the sample that moved, `0.0` for an empty sample.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.moved as f64 / self.total as f64
        }
    }

    /// Route `keys`, apply `change`, route again.
    ///
    /// Both routings must succeed, so the change must leave at least one node
    /// registered.
    pub fn measure<S, K, F>(strategy: &mut S, keys: &[K], change: F) -> Result<Self>
    where
        S: RoutingStrategy + ?Sized,
        K: AsRef<str>,
        F: FnOnce(&mut S),
    {
        let before = owners(strategy, keys)?;
        change(strategy);
        let after = owners(strategy, keys)?;
        Ok(Self::compare(&before, &after))
    }
}

impl std::fmt::Display for DisruptionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} keys moved ({:.1}%)",
            self.moved,
            self.total,
            self.fraction() * 100.0
        )
    }
}
