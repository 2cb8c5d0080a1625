//! Core hasher trait definitions.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A deterministic string hash.
///
/// Hashers are stateless and thread-safe. The same input must produce the
/// same output across calls and across process runs, otherwise routing
/// would not be reproducible.
pub trait KeyHasher: Clone + Send + Sync + 'static {
    /// Hashes `text` into a non-negative integer digest.
    fn hash(&self, text: &str) -> u64;

    /// Returns the name of this hasher.
    fn name(&self) -> &'static str;
}

/// Selector for the built-in hashers, used by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HasherKind {
    #[default]
    Sip,
    Xxh3,
    Blake3,
}

impl FromStr for HasherKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sip" | "siphash" => Ok(HasherKind::Sip),
            "xxh3" | "xxhash" => Ok(HasherKind::Xxh3),
            "blake3" => Ok(HasherKind::Blake3),
            other => Err(Error::UnknownHasher(other.to_string())),
        }
    }
}

impl fmt::Display for HasherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HasherKind::Sip => "sip",
            HasherKind::Xxh3 => "xxh3",
            HasherKind::Blake3 => "blake3",
        };
        f.write_str(name)
    }
}
