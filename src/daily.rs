use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::CandidateSet;

/// Served as the secret while no embedding index is loaded, so the rest
/// of the pipeline stays exercisable.
pub const FALLBACK_SECRET: &str = "실험";

/// Resolve the secret word for a calendar date.
///
/// Pure: the same date and candidate set always yield the same word,
/// across restarts. The RNG is seeded from an FNV-1a hash of the ISO
/// date string; `DefaultHasher` is avoided because its keys are not
/// guaranteed stable across Rust releases.
pub fn secret_for(date: NaiveDate, candidates: &CandidateSet) -> String {
    if candidates.is_empty() {
        return FALLBACK_SECRET.to_string();
    }
    let key = date.format("%Y-%m-%d").to_string();
    let mut rng = SmallRng::seed_from_u64(fnv1a(key.as_bytes()));
    candidates
        .words()
        .choose(&mut rng)
        .cloned()
        .unwrap_or_else(|| FALLBACK_SECRET.to_string())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}
