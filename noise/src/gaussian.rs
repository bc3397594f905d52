use rand::{Rng, rngs::SmallRng};
use rand_distr::StandardNormal;

use super::{NoiseErrors, NoiseTrait};

/// Gaussian white noise, N(mean, sigma)
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GaussianNoise {
    mean: f64,
    sigma: f64,
}

impl GaussianNoise {
    pub fn new(mean: f64, sigma: f64) -> Result<Self, NoiseErrors> {
        if !mean.is_finite() {
            return Err(NoiseErrors::InvalidMean(mean));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(NoiseErrors::InvalidStandardDeviation(sigma));
        }
        Ok(Self { mean, sigma })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl NoiseTrait for GaussianNoise {
    // always draws, so the stream position does not depend on sigma
    fn sample(&self, rng: &mut SmallRng) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.mean + self.sigma * z
    }
}
