//! SipHash-1-3 hasher (default).

use crate::hash::traits::KeyHasher;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// SipHash-1-3 with fixed zero keys, so digests are stable across runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipKeyHasher;

impl KeyHasher for SipKeyHasher {
    fn hash(&self, text: &str) -> u64 {
        let mut hasher = SipHasher13::new();
        hasher.write(text.as_bytes());
        hasher.finish()
    }

    fn name(&self) -> &'static str {
        "SipKeyHasher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sip_is_deterministic() {
        let hasher = SipKeyHasher;
        assert_eq!(hasher.hash("S1-1"), hasher.hash("S1-1"));
        assert_ne!(hasher.hash("S1-1"), hasher.hash("S1-2"));
    }
}
