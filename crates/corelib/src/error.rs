//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A key was routed while no node is registered.
    #[error("empty topology: no node registered to route key `{key}`")]
    EmptyTopology { key: String },
    /// Ring configuration rejected at build time.
    #[error("invalid ring configuration: {0}")]
    InvalidConfig(String),
    /// Unknown hasher name.
    #[error("unknown hasher `{0}` (expected one of: sip, xxh3, blake3)")]
    UnknownHasher(String),
}

impl Error {
    /// Builds an [`Error::EmptyTopology`] for `key`.
    pub fn empty_topology(key: impl Into<String>) -> Self {
        Error::EmptyTopology { key: key.into() }
    }
}
