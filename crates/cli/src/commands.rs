//! Subcommands and their results.

use std::fmt;
use std::sync::Arc;

use cache::{CacheSimulation, StatsReport};
use clap::{Args, Subcommand};
use corelib::hash::{Blake3KeyHasher, SipKeyHasher, Xxh3KeyHasher};
use corelib::ring::{DEFAULT_MAX_SLOTS, DEFAULT_REPLICATION_FACTOR};
use corelib::{HasherKind, NodeId, RingConfig, RingTopology};
use playback::{HeadlessSurface, Progress, Surface};
use routing::{DisruptionReport, ModuloHash, RoutingStrategy};
use serde::Serialize;
use sorting::Algorithm;
use tokio::sync::Mutex;
use tracing::info;

use crate::demos::{self, SessionOptions};

#[derive(Subcommand, Debug, Clone)]
#[command(rename_all = "kebab-case")]
pub enum Command {
    #[command(about = "Cache simulation routed by a consistent hash ring.")]
    ConsistentHash(RingDemoArgs),
    #[command(about = "Cache simulation routed by hash(key) mod node count.")]
    ModuloHash(CacheDemoArgs),
    #[command(about = "Bubble sort over random values.")]
    BubbleSort(SortArgs),
    #[command(about = "Selection sort over random values.")]
    SelectionSort(SortArgs),
    #[command(about = "Count the keys each strategy remaps when a node leaves or joins.")]
    Compare(CompareArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CacheDemoArgs {
    #[arg(long, help = "Seed for the key pool and request order")]
    pub seed: Option<u64>,

    #[arg(
        long,
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Number of distinct keys to draw requests from"
    )]
    pub keys: u64,

    #[arg(long, default_value_t = 100, help = "Gets per phase of the script")]
    pub requests: usize,

    #[arg(long, default_value_t = HasherKind::Sip, help = "sip, xxh3 or blake3")]
    pub hasher: HasherKind,

    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RingArgs {
    #[arg(long, default_value_t = DEFAULT_REPLICATION_FACTOR, help = "Replica slots per node")]
    pub replication_factor: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_SLOTS, help = "Size of the ring space")]
    pub max_slots: u64,
}

impl RingArgs {
    pub fn config(&self) -> RingConfig {
        RingConfig {
            max_slots: self.max_slots,
            replication_factor: self.replication_factor,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RingDemoArgs {
    #[command(flatten)]
    pub cache: CacheDemoArgs,

    #[command(flatten)]
    pub ring: RingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SortArgs {
    #[arg(long, default_value_t = 9, help = "Number of values")]
    pub len: usize,

    #[arg(long, default_value_t = 10)]
    pub min: u32,

    #[arg(long, default_value_t = 99)]
    pub max: u32,

    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u64).range(2..),
        help = "Nodes before the change, named S1..Sn"
    )]
    pub nodes: u64,

    #[arg(long, default_value_t = 1000, help = "Size of the key sample")]
    pub keys: usize,

    #[arg(long, default_value = "S2", help = "Node that leaves")]
    pub remove: String,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = HasherKind::Sip)]
    pub hasher: HasherKind,

    #[command(flatten)]
    pub ring: RingArgs,
}

/// Ring strategy with the chosen hasher.
pub fn ring_strategy(
    config: RingConfig,
    hasher: HasherKind,
) -> corelib::Result<Box<dyn RoutingStrategy>> {
    let strategy: Box<dyn RoutingStrategy> = match hasher {
        HasherKind::Sip => Box::new(RingTopology::with_config(config, SipKeyHasher)?),
        HasherKind::Xxh3 => Box::new(RingTopology::with_config(config, Xxh3KeyHasher)?),
        HasherKind::Blake3 => Box::new(RingTopology::with_config(config, Blake3KeyHasher)?),
    };
    Ok(strategy)
}

pub fn modulo_strategy(hasher: HasherKind) -> Box<dyn RoutingStrategy> {
    match hasher {
        HasherKind::Sip => Box::new(ModuloHash::with_hasher(SipKeyHasher)),
        HasherKind::Xxh3 => Box::new(ModuloHash::with_hasher(Xxh3KeyHasher)),
        HasherKind::Blake3 => Box::new(ModuloHash::with_hasher(Blake3KeyHasher)),
    }
}

/// Keys remapped by one strategy for one topology change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisruptionRow {
    pub strategy: String,
    pub change: String,
    pub moved: usize,
    pub total: usize,
    pub fraction: f64,
}

impl DisruptionRow {
    fn new(strategy: &str, change: String, report: DisruptionReport) -> Self {
        Self {
            strategy: strategy.to_owned(),
            change,
            moved: report.moved,
            total: report.total,
            fraction: report.fraction(),
        }
    }
}

/// Output of a command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    pub name: String,
    pub completed: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<StatsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disruption: Vec<DisruptionRow>,
}

impl CommandResult {
    fn new(name: impl Into<String>, progress: Progress) -> Self {
        Self {
            name: name.into(),
            completed: progress.completed,
            total: progress.total,
            cache: None,
            sorted: None,
            disruption: Vec::new(),
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}",
            self.name,
            Progress::new(self.completed, self.total)
        )?;
        if let Some(report) = &self.cache {
            writeln!(f, "{report}")?;
        }
        if let Some(values) = &self.sorted {
            writeln!(f, "sorted: {values:?}")?;
        }
        for row in &self.disruption {
            writeln!(
                f,
                "{:<15} {:<10} {}/{} keys moved ({:.1}%)",
                row.strategy,
                row.change,
                row.moved,
                row.total,
                row.fraction * 100.0
            )?;
        }
        Ok(())
    }
}

impl Command {
    /// Whether the result should be printed as JSON.
    pub fn json_output(&self) -> bool {
        match self {
            Command::ConsistentHash(args) => args.cache.json,
            Command::ModuloHash(args) => args.json,
            _ => false,
        }
    }

    pub async fn execute(&self, session: &SessionOptions) -> anyhow::Result<CommandResult> {
        match self {
            Command::ConsistentHash(args) => {
                let strategy = ring_strategy(args.ring.config(), args.cache.hasher)?;
                run_cache_demo("Consistent Hash", strategy, &args.cache, session).await
            }
            Command::ModuloHash(args) => {
                run_cache_demo("Modulo Hash", modulo_strategy(args.hasher), args, session).await
            }
            Command::BubbleSort(args) => run_sort_demo(Algorithm::Bubble, args, session).await,
            Command::SelectionSort(args) => {
                run_sort_demo(Algorithm::Selection, args, session).await
            }
            Command::Compare(args) => compare(args),
        }
    }
}

async fn run_cache_demo(
    name: &str,
    strategy: Box<dyn RoutingStrategy>,
    args: &CacheDemoArgs,
    session: &SessionOptions,
) -> anyhow::Result<CommandResult> {
    let mut rng = demos::rng(args.seed);
    let pool = demos::key_pool(args.keys as usize, &mut rng);
    let script = demos::cache_script(&pool, args.requests, &mut rng);

    let simulation = Arc::new(Mutex::new(CacheSimulation::new(strategy)));
    let surface: Arc<dyn Surface> = Arc::new(HeadlessSurface::new());
    let experiment = demos::cache_experiment(name, Arc::clone(&simulation), surface, script);

    let progress = demos::run_session(experiment, session).await?;
    let mut result = CommandResult::new(name, progress);
    result.cache = Some(simulation.lock().await.stats());
    Ok(result)
}

async fn run_sort_demo(
    algorithm: Algorithm,
    args: &SortArgs,
    session: &SessionOptions,
) -> anyhow::Result<CommandResult> {
    anyhow::ensure!(
        args.min <= args.max,
        "--min ({}) must not exceed --max ({})",
        args.min,
        args.max
    );
    let values = demos::random_values(args.len, args.min, args.max, &mut demos::rng(args.seed));
    info!(algorithm = %algorithm, ?values, "sorting");

    let (experiment, array) =
        demos::sort_experiment(algorithm, values, Arc::new(HeadlessSurface::new()));
    let progress = demos::run_session(experiment, session).await?;

    let mut result = CommandResult::new(algorithm.to_string(), progress);
    result.sorted = Some(array.values());
    Ok(result)
}

/// Route a key sample before and after a leave and a join, under both
/// strategies.
pub fn compare(args: &CompareArgs) -> anyhow::Result<CommandResult> {
    let nodes: Vec<NodeId> = (1..=args.nodes).map(|i| NodeId::new(format!("S{i}"))).collect();
    let leaving = NodeId::new(args.remove.clone());
    anyhow::ensure!(
        nodes.contains(&leaving),
        "--remove {leaving} is not one of S1..S{}",
        args.nodes
    );
    let joining = NodeId::new(format!("S{}", args.nodes + 1));
    let keys = demos::key_pool(args.keys, &mut demos::rng(args.seed));

    let build = |ring: bool| -> corelib::Result<Box<dyn RoutingStrategy>> {
        let mut strategy = if ring {
            ring_strategy(args.ring.config(), args.hasher)?
        } else {
            modulo_strategy(args.hasher)
        };
        for node in &nodes {
            strategy.add_node(node.clone());
        }
        Ok(strategy)
    };

    let mut rows = Vec::new();
    for ring in [true, false] {
        let mut strategy = build(ring)?;
        let name = strategy.name();
        let leave = DisruptionReport::measure(&mut strategy, keys.as_slice(), |s| {
            s.remove_node(&leaving);
        })?;
        rows.push(DisruptionRow::new(name, format!("-{leaving}"), leave));

        let mut strategy = build(ring)?;
        let join = DisruptionReport::measure(&mut strategy, keys.as_slice(), |s| {
            s.add_node(joining.clone());
        })?;
        rows.push(DisruptionRow::new(name, format!("+{joining}"), join));
    }

    let mut result = CommandResult::new("Compare", Progress::new(rows.len(), rows.len()));
    result.disruption = rows;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare_args() -> CompareArgs {
        CompareArgs {
            nodes: 3,
            keys: 1000,
            remove: "S2".to_string(),
            seed: Some(11),
            hasher: HasherKind::Sip,
            ring: RingArgs {
                replication_factor: DEFAULT_REPLICATION_FACTOR,
                max_slots: DEFAULT_MAX_SLOTS,
            },
        }
    }

    #[test]
    fn test_compare_ring_moves_fewer_keys() {
        let result = compare(&compare_args()).unwrap();
        assert_eq!(result.disruption.len(), 4);

        let moved = |strategy: &str, change: &str| {
            result
                .disruption
                .iter()
                .find(|row| row.strategy == strategy && row.change == change)
                .map(|row| row.moved)
                .unwrap()
        };
        assert!(moved("ConsistentHash", "-S2") < moved("ModuloHash", "-S2"));
        assert!(moved("ConsistentHash", "+S4") < moved("ModuloHash", "+S4"));
    }

    #[test]
    fn test_compare_rejects_unknown_node() {
        let mut args = compare_args();
        args.remove = "S9".to_string();
        assert!(compare(&args).is_err());
    }

    #[test]
    fn test_strategies_for_every_hasher() {
        for hasher in [HasherKind::Sip, HasherKind::Xxh3, HasherKind::Blake3] {
            let ring = ring_strategy(RingConfig::default(), hasher).unwrap();
            assert_eq!(ring.name(), "ConsistentHash");
            assert_eq!(modulo_strategy(hasher).name(), "ModuloHash");
        }
        let invalid = RingConfig {
            max_slots: 0,
            replication_factor: 1,
        };
        assert!(ring_strategy(invalid, HasherKind::Sip).is_err());
    }
}
