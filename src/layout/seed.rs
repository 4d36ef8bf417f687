//! Identifier-derived seeding.
//!
//! All layout randomness flows from xxHash64 digests of asset identifiers, so
//! the same identifier set always produces the same random streams. Wall-clock
//! time and OS entropy are never consulted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hash::Hasher;
use twox_hash::XxHash64;

const ID_HASH_SEED: u64 = 0x4153_5345_544e_4554;

/// Stable 64-bit digest of one identifier.
#[inline]
pub fn id_hash(id: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(ID_HASH_SEED);
    hasher.write(id.as_bytes());
    hasher.finish()
}

/// Seed for a whole graph, a pure function of its identifier set.
///
/// Identifiers are sorted before hashing, so insertion order does not matter.
pub fn graph_seed<'a>(ids: impl IntoIterator<Item = &'a str>) -> u64 {
    let mut sorted: Vec<&str> = ids.into_iter().collect();
    sorted.sort_unstable();
    let mut hasher = XxHash64::with_seed(ID_HASH_SEED);
    for id in sorted {
        hasher.write(id.as_bytes());
        // Separator so ["ab", "c"] and ["a", "bc"] hash differently.
        hasher.write_u8(0xff);
    }
    hasher.finish()
}

/// Random stream for one node within one graph.
pub fn node_rng(graph_seed: u64, id: &str) -> StdRng {
    StdRng::seed_from_u64(graph_seed ^ id_hash(id))
}

/// Unit-length direction keyed by identifier.
pub fn jitter_direction(id: &str) -> [f64; 3] {
    let mut rng = StdRng::seed_from_u64(id_hash(id));
    for _ in 0..16 {
        let v: [f64; 3] = [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)];
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if norm > 1e-3 {
            return [v[0] / norm, v[1] / norm, v[2] / norm];
        }
    }
    [1.0, 0.0, 0.0]
}
