//! Playback errors.

use thiserror::Error;

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// `reset`/`replay` called before any experiment was submitted.
    #[error("no experiment submitted")]
    NothingSubmitted,
    /// The session state channel was closed.
    #[error("playback session detached")]
    Detached,
    #[error("invalid speed `{0}`: expected a multiplier of at least 0.01, such as 2x, 0.5 or max")]
    InvalidSpeed(String),
    /// A unit returned an error; the run stopped there.
    #[error("unit #{index} `{name}` failed")]
    UnitFailed {
        index: usize,
        name: String,
        #[source]
        source: anyhow::Error,
    },
}
