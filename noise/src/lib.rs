pub mod gaussian;

pub use gaussian::GaussianNoise;

use rand::{SeedableRng, rngs::SmallRng};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NoiseErrors {
    #[error("noise mean must be finite, got {0}")]
    InvalidMean(f64),
    #[error("noise standard deviation must be finite and non-negative, got {0}")]
    InvalidStandardDeviation(f64),
}

pub trait NoiseTrait {
    fn sample(&self, rng: &mut SmallRng) -> f64;
}

static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Seed derived from the wall clock.
/// A process wide counter is mixed in so sources created within
/// the same clock tick still get different streams.
pub fn clock_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let count = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    nanos ^ count
        .wrapping_add(1)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// A seeded random stream owned by a single consumer.
/// Cloning copies the generator state, so a clone replays the same draws
/// until it is reseeded.
#[derive(Clone, Debug)]
pub struct NoiseSource {
    rng: SmallRng,
    seed: u64,
}

impl NoiseSource {
    pub fn new() -> Self {
        Self::from_seed(clock_seed())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub fn new_seed(&mut self) {
        self.reseed(clock_seed());
        log::debug!("noise source reseeded from clock: {}", self.seed);
    }

    pub fn sample<N: NoiseTrait>(&mut self, noise: &N) -> f64 {
        noise.sample(&mut self.rng)
    }
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::new()
    }
}
