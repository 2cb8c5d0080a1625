//! Hash primitive for placing keys and node replicas on the ring.
//!
//! Hashers turn a string into a deterministic `u64`. The ring reduces that
//! value modulo its slot count; the modulo strategy reduces it modulo the
//! node count.

pub mod blake;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use blake::Blake3KeyHasher;
pub use sip::SipKeyHasher;
pub use traits::{HasherKind, KeyHasher};
pub use xxh3::Xxh3KeyHasher;
