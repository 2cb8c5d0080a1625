//! BLAKE3 digest folded to 64 bits.

use crate::hash::traits::KeyHasher;

/// Hashes with BLAKE3 and keeps the first eight digest bytes (little-endian).
///
/// Slower than the non-cryptographic hashers but spreads short, similar
/// inputs such as `"S1-1"` / `"S1-2"` very evenly.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3KeyHasher;

impl KeyHasher for Blake3KeyHasher {
    fn hash(&self, text: &str) -> u64 {
        let digest = blake3::hash(text.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    fn name(&self) -> &'static str {
        "Blake3KeyHasher"
    }
}
