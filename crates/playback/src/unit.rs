//! The steppable unit contract.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::speed::Speed;
use crate::state::SessionState;
use crate::surface::{Effect, Surface};

/// One schedulable step of an algorithm.
///
/// `run` must be callable again after it completed so that a finished
/// experiment can be replayed.
#[async_trait]
pub trait Steppable: Send {
    fn name(&self) -> &str;

    async fn run(&mut self, ctx: &StepContext) -> anyhow::Result<()>;
}

/// Handle a running unit uses to reach its session.
#[derive(Clone)]
pub struct StepContext {
    state: Arc<watch::Sender<SessionState>>,
}

impl StepContext {
    pub(crate) fn new(state: Arc<watch::Sender<SessionState>>) -> Self {
        Self { state }
    }

    /// A context outside any controller: always playing, at `speed`.
    pub fn standalone(speed: Speed) -> Self {
        let config = PlaybackConfig::new().with_auto_play(true).with_speed(speed);
        let (state, _) = watch::channel(SessionState::new(&config));
        Self::new(Arc::new(state))
    }

    /// Suspension checkpoint: returns once the session is playing.
    ///
    /// Returns immediately when it already is. Call it between the internal
    /// steps of a long unit so pausing takes effect mid-unit.
    pub async fn on_step_completed(&self) -> Result<()> {
        let mut rx = self.state.subscribe();
        rx.wait_for(|s| s.playing)
            .await
            .map_err(|_| PlaybackError::Detached)?;
        Ok(())
    }

    pub fn speed(&self) -> Speed {
        self.state.borrow().speed
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// `base` adjusted for the current speed.
    pub fn scale(&self, base: Duration) -> Duration {
        self.speed().scale(base)
    }

    /// Log sink for human-readable progress text.
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "playback", "{message}");
        self.state.send_modify(|s| s.last_log = Some(message));
    }

    /// Run `effect` on `id` for `base` scaled by the current speed.
    pub async fn animate(&self, surface: &dyn Surface, id: &str, effect: Effect, base: Duration) {
        surface.run_transition(id, effect, self.scale(base)).await;
    }
}

impl std::fmt::Debug for StepContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepContext")
            .field("state", &*self.state.borrow())
            .finish()
    }
}

/// A unit built from a name and an async closure.
pub struct FnUnit<F> {
    name: String,
    f: F,
}

/// Wrap `f` as a [`Steppable`]. The closure is called once per run.
pub fn unit_fn<F, Fut>(name: impl Into<String>, f: F) -> FnUnit<F>
where
    F: FnMut(StepContext) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    FnUnit {
        name: name.into(),
        f,
    }
}

#[async_trait]
impl<F, Fut> Steppable for FnUnit<F>
where
    F: FnMut(StepContext) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&mut self, ctx: &StepContext) -> anyhow::Result<()> {
        (self.f)(ctx.clone()).await
    }
}
