use ::noise::{GaussianNoise, NoiseSource};
use log::debug;

use crate::{
    SensorTransform, TransformErrors, TransformKind,
    signal::{Components, Signal},
};

/// Gaussian white noise, y = x + N(mean, stddev) drawn independently per component.
/// Quaternion signals receive the draw as a small right-multiplied rotation.
///
/// Each instance owns one generator; every evaluation advances it.
/// Cloning copies the generator state, so reseed a clone that should not
/// replay the original's draws.
#[derive(Clone, Debug)]
pub struct NoiseTransform<S: Signal> {
    mean: S::Components,
    stddev: S::Components,
    models: Vec<GaussianNoise>,
    source: NoiseSource,
}

impl<S: Signal> NoiseTransform<S> {
    /// Creates the transform with a generator seeded from the clock
    pub fn new(mean: S::Components, stddev: S::Components) -> Result<Self, TransformErrors> {
        Self::with_source(mean, stddev, NoiseSource::new())
    }

    /// Creates the transform with a caller supplied seed, for reproducible runs
    pub fn with_seed(
        mean: S::Components,
        stddev: S::Components,
        seed: u64,
    ) -> Result<Self, TransformErrors> {
        Self::with_source(mean, stddev, NoiseSource::from_seed(seed))
    }

    /// Zero mean, zero deviation. Evaluates to its input.
    pub fn disabled() -> Self {
        Self {
            mean: S::Components::splat(0.0),
            stddev: S::Components::splat(0.0),
            models: vec![GaussianNoise::default(); S::Components::COUNT],
            source: NoiseSource::new(),
        }
    }

    fn with_source(
        mean: S::Components,
        stddev: S::Components,
        source: NoiseSource,
    ) -> Result<Self, TransformErrors> {
        let models = build_models(&mean, &stddev)?;
        Ok(Self {
            mean,
            stddev,
            models,
            source,
        })
    }

    pub fn mean(&self) -> S::Components {
        self.mean
    }

    pub fn stddev(&self) -> S::Components {
        self.stddev
    }

    pub fn set_mean(&mut self, mean: S::Components) -> Result<(), TransformErrors> {
        self.set_parameters(mean, self.stddev)
    }

    pub fn set_stddev(&mut self, stddev: S::Components) -> Result<(), TransformErrors> {
        self.set_parameters(self.mean, stddev)
    }

    /// Validates both parameters before changing either
    pub fn set_parameters(
        &mut self,
        mean: S::Components,
        stddev: S::Components,
    ) -> Result<(), TransformErrors> {
        self.models = build_models(&mean, &stddev)?;
        self.mean = mean;
        self.stddev = stddev;
        debug!("noise set to mean {mean:?}, stddev {stddev:?}");
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.source.seed()
    }

    pub fn reseed(&mut self, seed: u64) {
        self.source.reseed(seed);
        debug!("noise reseeded with {seed}");
    }

    pub fn new_seed(&mut self) {
        self.source.new_seed();
    }
}

fn build_models<C: Components>(mean: &C, stddev: &C) -> Result<Vec<GaussianNoise>, TransformErrors> {
    let models = mean
        .values()
        .zip(stddev.values())
        .map(|(mean, stddev)| GaussianNoise::new(mean, stddev))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(models)
}

impl<S: Signal> SensorTransform<S> for NoiseTransform<S> {
    fn evaluate(&mut self, x: &S) -> S {
        let models = &self.models;
        let source = &mut self.source;
        let draws = S::Components::from_fn(|i| source.sample(&models[i]));
        x.perturb(&draws)
    }

    fn kind(&self) -> TransformKind {
        TransformKind::Noise
    }
}

// the generator state is not a parameter
impl<S: Signal> PartialEq for NoiseTransform<S> {
    fn eq(&self, other: &Self) -> bool {
        self.mean == other.mean && self.stddev == other.stddev
    }
}
