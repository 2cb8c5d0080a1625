//! Drives an experiment's units and exposes the control surface.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, info_span, Instrument};

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::experiment::{Drawable, Experiment};
use crate::speed::Speed;
use crate::state::{Progress, SessionState, Status};
use crate::unit::StepContext;

type ProgressListener = Box<dyn FnMut(Progress) + Send>;

/// Cloneable control surface of a session.
#[derive(Clone)]
pub struct PlaybackHandle {
    state: Arc<watch::Sender<SessionState>>,
}

impl PlaybackHandle {
    /// Resume, or request a replay when the session has finished.
    pub fn play(&self) {
        self.state.send_modify(|s| {
            if s.status.is_finished() {
                debug!("replay requested");
                s.replay_requested = true;
            } else if s.status == Status::Paused {
                s.status = Status::Running;
            }
            s.playing = true;
        });
    }

    /// Stop at the next checkpoint.
    pub fn pause(&self) {
        self.state.send_modify(|s| {
            s.playing = false;
            if s.status == Status::Running {
                s.status = Status::Paused;
            }
        });
    }

    pub fn toggle(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn set_speed(&self, speed: Speed) {
        debug!(%speed, "speed changed");
        self.state.send_modify(|s| s.speed = speed);
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Snapshot of the session.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

/// Runs the units of a submitted [`Experiment`] one at a time.
///
/// Before the first unit and after every unit the controller waits at a
/// checkpoint while the session is paused. Units may add their own
/// checkpoints through [`StepContext::on_step_completed`].
pub struct PlaybackController {
    state: Arc<watch::Sender<SessionState>>,
    experiment: Option<Experiment>,
    listeners: Vec<ProgressListener>,
}

impl PlaybackController {
    pub fn new(config: PlaybackConfig) -> Self {
        let (state, _) = watch::channel(SessionState::new(&config));
        Self {
            state: Arc::new(state),
            experiment: None,
            listeners: Vec::new(),
        }
    }

    pub fn handle(&self) -> PlaybackHandle {
        PlaybackHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Call `listener` with `{completed, total}` at the start of a run and
    /// after every unit.
    pub fn on_progress(&mut self, listener: impl FnMut(Progress) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn experiment(&self) -> Option<&Experiment> {
        self.experiment.as_ref()
    }

    /// Load `experiment` and run it to completion.
    ///
    /// Waits while paused. A failing unit stops the run with
    /// [`PlaybackError::UnitFailed`] and leaves the session `Aborted`.
    pub async fn submit(&mut self, experiment: Experiment) -> Result<Progress> {
        info!(
            experiment = experiment.name(),
            units = experiment.len(),
            "experiment submitted"
        );
        self.experiment = Some(experiment);
        self.run().await
    }

    /// Wait until [`PlaybackHandle::play`] is called on a finished session,
    /// then reset and run the experiment again.
    pub async fn replay(&mut self) -> Result<Progress> {
        if self.experiment.is_none() {
            return Err(PlaybackError::NothingSubmitted);
        }
        let mut rx = self.state.subscribe();
        rx.wait_for(|s| s.replay_requested)
            .await
            .map_err(|_| PlaybackError::Detached)?;
        self.reset().await?;
        self.run().await
    }

    /// Restore the drawable and put the session back to `Idle`.
    pub async fn reset(&mut self) -> Result<()> {
        let experiment = self
            .experiment
            .as_ref()
            .ok_or(PlaybackError::NothingSubmitted)?;
        let drawable = experiment.drawable.clone();
        let total = experiment.len();
        let name = experiment.name().to_owned();
        // `Experiment` is not `Sync`, so no borrow of it may live across an await.
        if let Some(drawable) = drawable {
            drawable.reset().await;
        }
        self.state.send_modify(|s| {
            s.status = Status::Idle;
            s.progress = Progress::new(0, total);
            s.last_log = None;
            s.stats = None;
            s.replay_requested = false;
        });
        debug!(experiment = %name, "session reset");
        Ok(())
    }

    async fn run(&mut self) -> Result<Progress> {
        let Self {
            state,
            experiment,
            listeners,
        } = self;
        let experiment = experiment.as_mut().ok_or(PlaybackError::NothingSubmitted)?;
        drive(state, listeners, experiment).await
    }
}

async fn drive(
    state: &Arc<watch::Sender<SessionState>>,
    listeners: &mut [ProgressListener],
    experiment: &mut Experiment,
) -> Result<Progress> {
    let total = experiment.len();
    let ctx = StepContext::new(Arc::clone(state));

    state.send_modify(|s| {
        s.status = Status::Idle;
        s.progress = Progress::new(0, total);
        s.experiment = Some(experiment.name().to_owned());
        s.replay_requested = false;
    });
    ctx.log(format!("Running {}", experiment.name()));
    publish(state, listeners, experiment.drawable.as_deref(), Progress::new(0, total)).await;

    ctx.on_step_completed().await?;
    state.send_modify(|s| {
        s.status = if s.playing {
            Status::Running
        } else {
            Status::Paused
        };
    });

    for (index, unit) in experiment.units.iter_mut().enumerate() {
        let span = info_span!("unit", index, name = unit.name());
        if let Err(source) = unit.run(&ctx).instrument(span).await {
            let name = unit.name().to_owned();
            error!(index, unit = %name, error = %source, "unit failed, aborting run");
            state.send_modify(|s| {
                s.status = Status::Aborted;
                s.playing = false;
            });
            return Err(PlaybackError::UnitFailed {
                index,
                name,
                source,
            });
        }

        let progress = Progress::new(index + 1, total);
        publish(state, listeners, experiment.drawable.as_deref(), progress).await;
        ctx.on_step_completed().await?;
    }

    state.send_modify(|s| {
        s.status = Status::Completed;
        s.playing = false;
    });
    ctx.log(format!("Finished {}", experiment.name()));
    Ok(Progress::new(total, total))
}

async fn publish(
    state: &watch::Sender<SessionState>,
    listeners: &mut [ProgressListener],
    drawable: Option<&dyn Drawable>,
    progress: Progress,
) {
    let stats = match drawable {
        Some(drawable) => drawable.stats().await,
        None => None,
    };
    state.send_modify(|s| {
        s.progress = progress;
        if stats.is_some() {
            s.stats = stats;
        }
    });
    for listener in listeners.iter_mut() {
        listener(progress);
    }
    debug!(completed = progress.completed, total = progress.total, "progress");
}
