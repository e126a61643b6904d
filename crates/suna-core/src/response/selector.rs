//! Uniform-random selection among response variants.

use super::catalog::{ResponseCatalog, ResponseKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a response string for a resolved key.
///
/// Selection among multi-entry sets is uniform per call with no memory of
/// previous picks, so immediate repeats are possible and acceptable.
/// Single-entry sets are deterministic. The random source is owned by the
/// selector so tests can seed it and assert exact output.
pub struct ResponseSelector {
    rng: StdRng,
}

impl ResponseSelector {
    /// Creates a selector with an entropy-seeded random source.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a selector with a fixed seed, for deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns one response for `key`, never an empty string.
    pub fn select(&mut self, catalog: &ResponseCatalog, key: ResponseKey) -> String {
        let set = catalog.candidates(key);
        let set = if set.is_empty() {
            catalog.fallback()
        } else {
            set
        };
        let index = if set.len() == 1 {
            0
        } else {
            self.rng.gen_range(0..set.len())
        };
        set[index].to_string()
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}
