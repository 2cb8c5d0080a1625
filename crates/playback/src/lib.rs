//! Cooperative step execution and playback.
//!
//! An algorithm is written as ordinary sequential async code and split into
//! [`Steppable`] units. The [`PlaybackController`] runs the units in order,
//! one at a time, and between units (and at any checkpoint a unit asks for
//! through [`StepContext::on_step_completed`]) it waits while the session is
//! paused. A [`PlaybackHandle`] is the control surface: play, pause, speed,
//! replay.
//!
//! ```text
//! PlaybackHandle ──play/pause/speed──▶ watch<SessionState> ◀──checkpoints── StepContext
//!                                            ▲                                  │
//!                                            └──progress── PlaybackController ──┘ runs units
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod experiment;
pub mod speed;
pub mod state;
pub mod surface;
pub mod unit;

pub use config::PlaybackConfig;
pub use controller::{PlaybackController, PlaybackHandle};
pub use error::{PlaybackError, Result};
pub use experiment::{Drawable, Experiment};
pub use speed::Speed;
pub use state::{Progress, SessionState, Status};
pub use surface::{Effect, HeadlessSurface, Surface};
pub use unit::{unit_fn, FnUnit, StepContext, Steppable};
