//! Hit/miss statistics and the report table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters kept per node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Keys stored on the node.
    pub keys: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Hits and misses summed over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub hits: u64,
    pub misses: u64,
}

impl Counters {
    pub fn hit_ratio(&self) -> u64 {
        hit_ratio(self.hits, self.misses)
    }
}

/// One line of the stats table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRow {
    pub node: String,
    pub keys: u64,
    pub hits: u64,
    pub misses: u64,
    /// Percentage, rounded to the nearest integer.
    pub hit_ratio: u64,
}

impl StatsRow {
    pub fn new(node: impl Into<String>, keys: u64, hits: u64, misses: u64) -> Self {
        Self {
            node: node.into(),
            keys,
            hits,
            misses,
            hit_ratio: hit_ratio(hits, misses),
        }
    }
}

/// `round(hits * 100 / (hits + misses))`, `0` when there was no traffic.
pub fn hit_ratio(hits: u64, misses: u64) -> u64 {
    let total = hits + misses;
    if total == 0 {
        return 0;
    }
    (hits as f64 * 100.0 / total as f64).round() as u64
}

/// Snapshot of a simulation's statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    /// One row per live node, ordered by node id.
    pub nodes: Vec<StatsRow>,
    /// Sum over the live nodes, labelled `Overall`.
    pub overall: StatsRow,
    /// Every hit and miss since the last reset, including traffic served by
    /// nodes that have since been removed.
    pub lifetime: Counters,
}

impl StatsReport {
    pub(crate) fn from_rows(nodes: Vec<StatsRow>, lifetime: Counters) -> Self {
        let (keys, hits, misses) = nodes.iter().fold((0, 0, 0), |(k, h, m), row| {
            (k + row.keys, h + row.hits, m + row.misses)
        });
        Self {
            nodes,
            overall: StatsRow::new("Overall", keys, hits, misses),
            lifetime,
        }
    }

    /// Node rows followed by the overall row.
    pub fn rows(&self) -> impl Iterator<Item = &StatsRow> {
        self.nodes.iter().chain(std::iter::once(&self.overall))
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows()
            .map(|row| row.node.len())
            .max()
            .unwrap_or(0)
            .max("node".len());

        writeln!(
            f,
            "{:<width$}  {:>6}  {:>6}  {:>6}  {:>9}",
            "node", "keys", "hits", "misses", "hit ratio"
        )?;
        for row in self.rows() {
            writeln!(
                f,
                "{:<width$}  {:>6}  {:>6}  {:>6}  {:>8}%",
                row.node, row.keys, row.hits, row.misses, row.hit_ratio
            )?;
        }
        write!(
            f,
            "lifetime: {} hits / {} misses ({}%)",
            self.lifetime.hits,
            self.lifetime.misses,
            self.lifetime.hit_ratio()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_ratio_rounding() {
        assert_eq!(hit_ratio(0, 0), 0);
        assert_eq!(hit_ratio(1, 0), 100);
        assert_eq!(hit_ratio(0, 5), 0);
        assert_eq!(hit_ratio(1, 2), 33);
        assert_eq!(hit_ratio(2, 1), 67);
        assert_eq!(hit_ratio(1, 1), 50);
    }

    #[test]
    fn test_overall_sums_rows() {
        let report = StatsReport::from_rows(
            vec![StatsRow::new("S1", 3, 4, 3), StatsRow::new("S2", 1, 0, 1)],
            Counters { hits: 6, misses: 5 },
        );
        assert_eq!(report.overall, StatsRow::new("Overall", 4, 4, 4));
        assert_eq!(report.overall.hit_ratio, 50);
        assert_eq!(report.rows().count(), 3);
    }

    #[test]
    fn test_table_layout() {
        let report = StatsReport::from_rows(
            vec![StatsRow::new("S1", 1, 1, 1)],
            Counters { hits: 1, misses: 1 },
        );
        let table = report.to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("node"));
        assert!(lines[1].starts_with("S1"));
        assert!(lines[2].starts_with("Overall"));
        assert!(lines[2].ends_with("50%"));
        assert_eq!(lines[3], "lifetime: 1 hits / 1 misses (50%)");
    }
}
