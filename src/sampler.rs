//! Random draws without replacement
//!
//! Every spin frame and every final outcome is a fresh draw of distinct
//! games from one provider's pool, shuffle-and-take style.

use crate::catalog::Game;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded sampler shared by all three columns
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: ChaCha8Rng,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Deterministic sampler for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw up to `k` distinct games from `pool`. When the pool holds
    /// fewer than `k` games the whole pool is returned (shuffled); this
    /// is the degraded case, not an error.
    pub fn sample(&mut self, pool: &[Game], k: usize) -> Vec<Game> {
        let mut indices: Vec<usize> = (0..pool.len()).collect();
        indices.shuffle(&mut self.rng);
        indices.truncate(k);
        indices.into_iter().map(|i| pool[i].clone()).collect()
    }
}
