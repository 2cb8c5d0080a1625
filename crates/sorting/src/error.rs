use playback::PlaybackError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("index {index} out of bounds for array of length {len}")]
    OutOfBounds { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error(transparent)]
    Array(#[from] ArrayError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}
