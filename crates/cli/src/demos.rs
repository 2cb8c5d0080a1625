//! Demo experiments and the session runner.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cache::CacheSimulation;
use corelib::NodeId;
use futures::future::join_all;
use playback::{
    Drawable, Effect, Experiment, PlaybackConfig, PlaybackController, Progress, Speed,
    StepContext, Steppable, Surface,
};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use routing::RoutingStrategy;
use sorting::{Algorithm, VisualArray};
use tokio::io::AsyncBufRead;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::control::{self, InputEnd};

const KEY_LEN: usize = 6;
/// Node fade in/out at normal speed.
const NODE_FADE: Duration = Duration::from_millis(500);
/// Key travelling to its node at normal speed.
const ROUTE: Duration = Duration::from_millis(1000);

/// How a session is played.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub speed: Speed,
    /// Start paused; needs `interactive` to ever resume.
    pub paused: bool,
    /// Read control commands from stdin.
    pub interactive: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            speed: Speed::MAX,
            paused: false,
            interactive: false,
        }
    }
}

/// Seeded generator, or one from entropy without a seed.
pub fn rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// `size` random alphanumeric keys.
pub fn key_pool(size: usize, rng: &mut impl Rng) -> Vec<String> {
    (0..size)
        .map(|_| {
            (0..KEY_LEN)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect()
        })
        .collect()
}

pub fn random_values(len: usize, min: u32, max: u32, rng: &mut impl Rng) -> Vec<u32> {
    (0..len).map(|_| rng.gen_range(min..=max)).collect()
}

/// What the data source returns for `key`.
pub fn value_of(key: &str) -> String {
    format!("{key}'s value from data source")
}

/// One scripted cache operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCommand {
    AddNode(NodeId),
    RemoveNode(NodeId),
    Get(String),
}

impl fmt::Display for CacheCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheCommand::AddNode(node) => write!(f, "add {node}"),
            CacheCommand::RemoveNode(node) => write!(f, "remove {node}"),
            CacheCommand::Get(key) => write!(f, "get {key}"),
        }
    }
}

/// The cache demo script.
///
/// Three nodes, then `requests` gets; S2 leaves and S4 joins, more gets;
/// S1 leaves and S5 joins, more gets. Keys are drawn from `pool`.
pub fn cache_script(pool: &[String], requests: usize, rng: &mut impl Rng) -> Vec<CacheCommand> {
    let mut script = Vec::with_capacity(7 + 3 * requests);
    let mut gets = |script: &mut Vec<CacheCommand>| {
        for _ in 0..requests {
            if let Some(key) = pool.choose(rng) {
                script.push(CacheCommand::Get(key.clone()));
            }
        }
    };

    for node in ["S1", "S2", "S3"] {
        script.push(CacheCommand::AddNode(NodeId::from(node)));
    }
    gets(&mut script);
    script.push(CacheCommand::RemoveNode(NodeId::from("S2")));
    script.push(CacheCommand::AddNode(NodeId::from("S4")));
    gets(&mut script);
    script.push(CacheCommand::RemoveNode(NodeId::from("S1")));
    script.push(CacheCommand::AddNode(NodeId::from("S5")));
    gets(&mut script);
    script
}

pub type SharedSimulation<S> = Arc<Mutex<CacheSimulation<S>>>;

/// A [`CacheCommand`] as a unit of a session.
struct CacheStep<S> {
    name: String,
    command: CacheCommand,
    simulation: SharedSimulation<S>,
    surface: Arc<dyn Surface>,
}

#[async_trait]
impl<S: RoutingStrategy> Steppable for CacheStep<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&mut self, ctx: &StepContext) -> anyhow::Result<()> {
        let mut simulation = self.simulation.lock().await;
        let surface = self.surface.as_ref();

        match &self.command {
            CacheCommand::AddNode(node) => {
                ctx.log(format!("Adding node: {node}"));
                if simulation.add_node(node.clone()) {
                    surface.add_visual(node.as_str(), node.as_str());
                    ctx.animate(surface, node.as_str(), Effect::Appear, NODE_FADE)
                        .await;
                }
            }
            CacheCommand::RemoveNode(node) => {
                ctx.log(format!("Removing node: {node}"));
                if simulation.remove_node(node) {
                    ctx.animate(surface, node.as_str(), Effect::Disappear, NODE_FADE)
                        .await;
                    surface.remove_visual(node.as_str());
                }
            }
            CacheCommand::Get(key) => {
                ctx.log(format!("Route key: {key}"));
                let value = value_of(key);
                let lookup = simulation
                    .get_or_fetch_detailed(key, || async move { Ok::<_, Infallible>(value) })
                    .await?;

                let visual = format!("key:{key}");
                let node = lookup.node.as_str();
                surface.add_visual(&visual, key);
                tokio::join!(
                    ctx.animate(surface, &visual, Effect::MoveOnto(node.to_owned()), ROUTE),
                    ctx.animate(surface, node, Effect::Highlight, ROUTE),
                );
                surface.remove_visual(&visual);
                debug!(key = %key, node, cached = lookup.cached, "served");
            }
        }
        Ok(())
    }
}

/// Clears the nodes off the surface and resets the simulation on replay.
struct CacheBoard<S> {
    simulation: SharedSimulation<S>,
    surface: Arc<dyn Surface>,
}

#[async_trait]
impl<S: RoutingStrategy> Drawable for CacheBoard<S> {
    async fn reset(&self) {
        let mut simulation = self.simulation.lock().await;
        let nodes: Vec<NodeId> = simulation.node_ids().cloned().collect();
        join_all(nodes.iter().map(|node| {
            self.surface
                .run_transition(node.as_str(), Effect::Disappear, Duration::ZERO)
        }))
        .await;
        for node in &nodes {
            self.surface.remove_visual(node.as_str());
        }
        simulation.reset();
    }

    async fn stats(&self) -> Option<String> {
        Some(self.simulation.lock().await.stats().to_string())
    }
}

/// Experiment running `script` against `simulation`.
pub fn cache_experiment<S: RoutingStrategy>(
    name: &str,
    simulation: SharedSimulation<S>,
    surface: Arc<dyn Surface>,
    script: Vec<CacheCommand>,
) -> Experiment {
    let board = CacheBoard {
        simulation: Arc::clone(&simulation),
        surface: Arc::clone(&surface),
    };
    let mut experiment = Experiment::new(name).with_drawable(Arc::new(board));
    for command in script {
        experiment.push(CacheStep {
            name: command.to_string(),
            command,
            simulation: Arc::clone(&simulation),
            surface: Arc::clone(&surface),
        });
    }
    experiment
}

/// Experiment sorting `values`, plus the array it sorts.
pub fn sort_experiment(
    algorithm: Algorithm,
    values: Vec<u32>,
    surface: Arc<dyn Surface>,
) -> (Experiment, Arc<VisualArray<u32>>) {
    let array = Arc::new(VisualArray::new("items", values, surface));
    (algorithm.experiment(Arc::clone(&array)), array)
}

/// Report every tenth of the run, and the end.
fn is_milestone(progress: Progress) -> bool {
    let step = (progress.total / 10).max(1);
    progress.is_complete() || progress.completed % step == 0
}

/// Play `experiment` to the end.
///
/// Interactive sessions keep going after completion: `replay` runs the
/// experiment again and the session ends on `quit`.
pub async fn run_session(
    experiment: Experiment,
    options: &SessionOptions,
) -> anyhow::Result<Progress> {
    let config = PlaybackConfig::new()
        .with_auto_play(!options.paused)
        .with_speed(options.speed);
    let mut controller = PlaybackController::new(config);
    controller.on_progress(|progress| {
        if is_milestone(progress) {
            info!(target: "simufast", "{progress}");
        }
    });

    if !options.interactive {
        return Ok(controller.submit(experiment).await?);
    }
    if options.paused {
        info!("session paused; type `play` to start");
    }
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    run_interactive(controller, experiment, input).await
}

/// Play `experiment` while applying control commands read from `input`.
///
/// `quit` ends the session where it stands. End of input only stops reading
/// commands: the current run still plays to the end.
pub async fn run_interactive<R>(
    mut controller: PlaybackController,
    experiment: Experiment,
    input: R,
) -> anyhow::Result<Progress>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let handle = controller.handle();
    let mut control = tokio::spawn(control::read_commands(input, handle.clone()));
    let session = play_until_error(&mut controller, experiment);
    tokio::pin!(session);

    let end = tokio::select! {
        result = &mut session => {
            control.abort();
            return result;
        }
        joined = &mut control => joined??,
    };
    if end == InputEnd::Quit {
        return Ok(handle.state().progress);
    }

    let state = handle.state();
    if !state.playing && !state.status.is_finished() {
        warn!("control input closed while paused; the session cannot resume");
    }
    let mut rx = handle.subscribe();
    let finished = async move {
        rx.wait_for(|s| s.status.is_finished() && !s.replay_requested())
            .await
            .map(|_| ())
    };
    tokio::select! {
        biased;
        result = &mut session => result,
        finished = finished => {
            finished?;
            Ok(handle.state().progress)
        }
    }
}

async fn play_until_error(
    controller: &mut PlaybackController,
    experiment: Experiment,
) -> anyhow::Result<Progress> {
    controller.submit(experiment).await?;
    loop {
        info!("finished; type `replay` to run again or `quit` to exit");
        controller.replay().await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_script_shape() {
        let mut rng = rng(Some(1));
        let pool = key_pool(10, &mut rng);
        let script = cache_script(&pool, 5, &mut rng);

        assert_eq!(script.len(), 7 + 15);
        assert_eq!(script[0], CacheCommand::AddNode(NodeId::from("S1")));
        assert_eq!(script[8], CacheCommand::RemoveNode(NodeId::from("S2")));
        assert_eq!(script[9], CacheCommand::AddNode(NodeId::from("S4")));
        assert!(script.iter().all(|c| match c {
            CacheCommand::Get(key) => pool.contains(key),
            _ => true,
        }));
    }

    #[test]
    fn test_seeded_pool_is_reproducible() {
        let a = key_pool(5, &mut rng(Some(42)));
        let b = key_pool(5, &mut rng(Some(42)));
        assert_eq!(a, b);
        assert!(a.iter().all(|k| k.len() == KEY_LEN));
    }

    #[test]
    fn test_random_values_in_range() {
        let values = random_values(50, 10, 99, &mut rng(Some(3)));
        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|v| (10..=99).contains(v)));
    }

    #[test]
    fn test_milestones() {
        assert!(is_milestone(Progress::new(0, 5)));
        assert!(is_milestone(Progress::new(3, 5)));
        assert!(is_milestone(Progress::new(30, 307)));
        assert!(!is_milestone(Progress::new(31, 307)));
        assert!(is_milestone(Progress::new(307, 307)));
    }
}
