//! Cache simulation behaviour over both routing strategies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cache::{CacheError, CacheSimulation, Counters, StatsRow};
use corelib::{NodeId, RingTopology};
use routing::{ModuloHash, RoutingStrategy};

fn value_of(key: &str) -> String {
    format!("{key}'s value from data source")
}

/// A fetch that counts its invocations.
fn counting_fetch(
    calls: &Arc<AtomicUsize>,
    key: &str,
) -> impl FnOnce() -> std::future::Ready<Result<String, std::convert::Infallible>> {
    let calls = Arc::clone(calls);
    let value = value_of(key);
    move || {
        calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Ok(value))
    }
}

fn ring_simulation(nodes: &[&str]) -> CacheSimulation<RingTopology> {
    let mut sim = CacheSimulation::new(RingTopology::new());
    for node in nodes {
        sim.add_node(*node);
    }
    sim
}

#[tokio::test]
async fn test_hit_miss_accounting() {
    let mut sim = ring_simulation(&["S1", "S2", "S3"]);
    let calls = Arc::new(AtomicUsize::new(0));

    let first = sim.get_or_fetch("x", counting_fetch(&calls, "x")).await.unwrap();
    let owner = sim.strategy().node_for_key("x").unwrap();
    let after_first = sim.node(&owner).unwrap().stats();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!((after_first.keys, after_first.hits, after_first.misses), (1, 0, 1));

    let second = sim.get_or_fetch("x", counting_fetch(&calls, "x")).await.unwrap();
    let after_second = sim.node(&owner).unwrap().stats();
    assert_eq!(calls.load(Ordering::SeqCst), 1, "a hit must not fetch");
    assert_eq!((after_second.keys, after_second.hits, after_second.misses), (1, 1, 1));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_detailed_lookup_reports_node_and_hit() {
    let mut sim = ring_simulation(&["S1", "S2"]);
    let calls = Arc::new(AtomicUsize::new(0));

    let miss = sim
        .get_or_fetch_detailed("key", counting_fetch(&calls, "key"))
        .await
        .unwrap();
    let hit = sim
        .get_or_fetch_detailed("key", counting_fetch(&calls, "key"))
        .await
        .unwrap();

    assert!(!miss.cached);
    assert!(hit.cached);
    assert_eq!(miss.node, hit.node);
    assert_eq!(hit.value, value_of("key"));
}

#[tokio::test]
async fn test_fetch_failure_propagates_and_caches_nothing() {
    let mut sim = ring_simulation(&["S1"]);

    let err = sim
        .get_or_fetch("x", || async { Err::<String, _>(anyhow::anyhow!("data source down")) })
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::Fetch { ref key, .. } if key == "x"));
    assert_eq!(
        std::error::Error::source(&err).map(|e| e.to_string()),
        Some("data source down".to_string())
    );

    let stats = sim.stats();
    assert_eq!(stats.overall, StatsRow::new("Overall", 0, 0, 0));
    assert!(!sim.node(&NodeId::from("S1")).unwrap().contains_key("x"));

    // The next call fetches again and succeeds.
    let calls = Arc::new(AtomicUsize::new(0));
    sim.get_or_fetch("x", counting_fetch(&calls, "x")).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_removed_node_loses_its_keys() {
    let mut sim = ring_simulation(&["S1", "S2", "S3"]);
    let calls = Arc::new(AtomicUsize::new(0));
    let keys: Vec<String> = (0..200).map(|i| format!("key-{i}")).collect();

    for key in &keys {
        sim.get_or_fetch(key, counting_fetch(&calls, key)).await.unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 200);

    let s2 = NodeId::from("S2");
    let s2_keys = keys
        .iter()
        .filter(|k| sim.node(&s2).unwrap().contains_key(k))
        .count();
    assert!(sim.remove_node(&s2));
    assert!(!sim.remove_node(&s2), "second removal is a no-op");

    for key in &keys {
        sim.get_or_fetch(key, counting_fetch(&calls, key)).await.unwrap();
    }
    // Only the keys S2 held are fetched again.
    assert_eq!(calls.load(Ordering::SeqCst), 200 + s2_keys);

    let stats = sim.stats();
    assert_eq!(stats.nodes.len(), 2);
    assert_eq!(stats.lifetime.misses, (200 + s2_keys) as u64);
    assert_eq!(stats.lifetime.hits, (200 - s2_keys) as u64);
}

#[tokio::test]
async fn test_modulo_topology_change_causes_more_misses() {
    let keys: Vec<String> = (0..500).map(|i| format!("item-{i}")).collect();

    async fn misses_after_removal<S: RoutingStrategy>(
        mut sim: CacheSimulation<S>,
        keys: &[String],
    ) -> u64 {
        for node in ["S1", "S2", "S3"] {
            sim.add_node(node);
        }
        for key in keys {
            let value = value_of(key);
            sim.get_or_fetch(key, || async move { Ok::<_, std::convert::Infallible>(value) })
                .await
                .unwrap();
        }
        sim.remove_node(&NodeId::from("S2"));
        let before = sim.stats().lifetime.misses;
        for key in keys {
            let value = value_of(key);
            sim.get_or_fetch(key, || async move { Ok::<_, std::convert::Infallible>(value) })
                .await
                .unwrap();
        }
        sim.stats().lifetime.misses - before
    }

    let ring = misses_after_removal(CacheSimulation::new(RingTopology::new()), &keys).await;
    let modulo = misses_after_removal(CacheSimulation::new(ModuloHash::new()), &keys).await;
    assert!(ring < modulo, "ring misses {ring}, modulo misses {modulo}");
}

#[tokio::test]
async fn test_reset_matches_fresh_instance() {
    let mut sim = ring_simulation(&["S1", "S2"]);
    let calls = Arc::new(AtomicUsize::new(0));
    for key in ["a", "b", "c", "a"] {
        sim.get_or_fetch(key, counting_fetch(&calls, key)).await.unwrap();
    }
    sim.remove_node(&NodeId::from("S1"));

    sim.reset();
    let fresh: CacheSimulation<RingTopology> = CacheSimulation::new(RingTopology::new());

    assert_eq!(sim.stats(), fresh.stats());
    assert_eq!(sim.stats().lifetime, Counters::default());
    assert_eq!(sim.node_count(), 0);
    assert!(sim.strategy().nodes().is_empty());
    assert!(matches!(
        sim.get_or_fetch("a", counting_fetch(&calls, "a")).await,
        Err(CacheError::Routing(_))
    ));

    // The reset simulation is fully usable again.
    sim.add_node("S1");
    sim.get_or_fetch("a", counting_fetch(&calls, "a")).await.unwrap();
    assert_eq!(sim.stats().overall.misses, 1);
}

#[tokio::test]
async fn test_stats_serialize() {
    let mut sim = ring_simulation(&["S1"]);
    let calls = Arc::new(AtomicUsize::new(0));
    sim.get_or_fetch("a", counting_fetch(&calls, "a")).await.unwrap();
    sim.get_or_fetch("a", counting_fetch(&calls, "a")).await.unwrap();

    let json = serde_json::to_value(sim.stats()).unwrap();
    assert_eq!(json["overall"]["node"], "Overall");
    assert_eq!(json["overall"]["hit_ratio"], 50);
    assert_eq!(json["nodes"][0]["node"], "S1");
}
