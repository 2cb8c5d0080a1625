//! xxh3 hasher.

use crate::hash::traits::KeyHasher;
use xxhash_rust::xxh3::xxh3_64;

/// 64-bit xxh3 over the UTF-8 bytes of the input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3KeyHasher;

impl KeyHasher for Xxh3KeyHasher {
    fn hash(&self, text: &str) -> u64 {
        xxh3_64(text.as_bytes())
    }

    fn name(&self) -> &'static str {
        "Xxh3KeyHasher"
    }
}
