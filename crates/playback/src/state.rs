//! Observable session state.

use std::fmt;

use crate::config::PlaybackConfig;
use crate::speed::Speed;

/// Lifecycle of a playback session.
///
/// `Idle -> Running <-> Paused -> Completed`. A failed unit ends the run in
/// `Aborted`. Both terminal states accept a replay, which goes back to
/// `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
    Aborted,
}

impl Status {
    /// `true` for `Completed` and `Aborted`.
    pub fn is_finished(self) -> bool {
        matches!(self, Status::Completed | Status::Aborted)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Paused => "paused",
            Status::Completed => "completed",
            Status::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Units completed out of the submitted total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Progress: {}/{}", self.completed, self.total)
    }
}

/// Everything a control surface can observe about a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub playing: bool,
    pub speed: Speed,
    pub status: Status,
    pub progress: Progress,
    /// Name of the submitted experiment.
    pub experiment: Option<String>,
    /// Latest message sent through [`StepContext::log`](crate::StepContext::log).
    pub last_log: Option<String>,
    /// Latest stats text from the experiment's drawable.
    pub stats: Option<String>,
    pub(crate) replay_requested: bool,
}

impl SessionState {
    pub(crate) fn new(config: &PlaybackConfig) -> Self {
        Self {
            playing: config.auto_play,
            speed: config.speed,
            status: Status::Idle,
            progress: Progress::default(),
            experiment: None,
            last_log: None,
            stats: None,
            replay_requested: false,
        }
    }

    /// A replay was requested and the controller has not picked it up yet.
    pub fn replay_requested(&self) -> bool {
        self.replay_requested
    }
}
