//! Seeding of the study's random draws.
//!
//! There is no process-wide generator: every draw takes its seed as an
//! argument, and the noise draws of a run use a seed derived from the run
//! seed so they never replay the resampling sequence.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::SeedableRng;
use siphasher::sip::SipHasher13;

/// Seed of every resampling step unless the configuration overrides it.
pub const DEFAULT_SEED: u64 = 1234;

/// Generator for draws seeded directly with `seed`.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Seed of the numbered `stream` within the run seeded with `seed`.
///
/// Hashes the little-endian bytes with zero-keyed SipHash-1-3, so the value
/// is the same on every platform.
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    let mut hasher = SipHasher13::new();
    hasher.write(&seed.to_le_bytes());
    hasher.write(&stream.to_le_bytes());
    hasher.finish()
}
