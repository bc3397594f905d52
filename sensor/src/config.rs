use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use transforms::{builder::TransformBuilder, chain::TransformChain, signal::Signal};

use crate::{SensorErrors, accelerometer::Accelerometer, pipeline::SensorPipeline};

/// A generic pipeline as written in a RON config
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SensorBuilder<S: Signal> {
    #[serde(default)]
    pub sample_period: f64,
    #[serde(default)]
    pub delay: f64,
    #[serde(default)]
    pub transforms: Vec<TransformBuilder<S>>,
}

impl<S: Signal> Default for SensorBuilder<S> {
    fn default() -> Self {
        Self {
            sample_period: 0.0,
            delay: 0.0,
            transforms: Vec::new(),
        }
    }
}

impl<S: Signal> SensorBuilder<S> {
    pub fn from_ron(text: &str) -> Result<Self, SensorErrors> {
        Ok(ron::from_str(text)?)
    }

    pub fn build(&self) -> Result<SensorPipeline<S>, SensorErrors> {
        let chain = self
            .transforms
            .iter()
            .map(TransformBuilder::build)
            .collect::<Result<TransformChain<S>, _>>()?;
        SensorPipeline::new(self.sample_period, self.delay, chain)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelerometerBuilder {
    pub sample_period: f64,
    pub delay: f64,
    pub bits: f64,
    pub range: Vector3<f64>,
    pub noise_mean: Vector3<f64>,
    pub noise_stddev: Vector3<f64>,
    /// clock seeded when absent
    pub seed: Option<u64>,
}

impl Default for AccelerometerBuilder {
    fn default() -> Self {
        Self {
            sample_period: 0.0,
            delay: 0.0,
            bits: 16.0,
            range: Vector3::repeat(2.0 * 16.0 * 9.80665),
            noise_mean: Vector3::zeros(),
            noise_stddev: Vector3::zeros(),
            seed: None,
        }
    }
}

impl AccelerometerBuilder {
    pub fn from_ron(text: &str) -> Result<Self, SensorErrors> {
        Ok(ron::from_str(text)?)
    }

    pub fn build(&self) -> Result<Accelerometer, SensorErrors> {
        let mut accelerometer = Accelerometer::new(self.sample_period, self.delay)?;
        if let Some(seed) = self.seed {
            accelerometer = accelerometer.with_seed(seed)?;
        }
        accelerometer.initialize(self.bits, self.range, self.noise_mean, self.noise_stddev)?;
        Ok(accelerometer)
    }
}
