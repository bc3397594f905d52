use std::path::Path;

use log::debug;
use nalgebra::Vector3;
use transforms::{
    TransformKind, chain::TransformChain, digitize::DigitizeTransform, noise::NoiseTransform,
};

use crate::{
    SensorErrors, SensorModel,
    pipeline::{SensorPipeline, StepActivity},
};

/// Three axis accelerometer: gaussian noise followed by digitization.
/// Both start disabled until `initialize` is called.
#[derive(Clone, Debug)]
pub struct Accelerometer {
    pipeline: SensorPipeline<Vector3<f64>>,
}

impl Accelerometer {
    pub fn new(sample_period: f64, delay: f64) -> Result<Self, SensorErrors> {
        let chain = TransformChain::new()
            .with(NoiseTransform::<Vector3<f64>>::disabled())
            .with(DigitizeTransform::<Vector3<f64>>::passthrough());
        let pipeline = SensorPipeline::new(sample_period, delay, chain)?;
        Ok(Self { pipeline })
    }

    pub fn with_seed(mut self, seed: u64) -> Result<Self, SensorErrors> {
        self.noise_transform_mut()?.reseed(seed);
        Ok(self)
    }

    /// Sets the digitizer and the noise parameters together.
    /// Nothing is changed unless all four are valid. The noise stream is kept.
    pub fn initialize(
        &mut self,
        bits: f64,
        range: Vector3<f64>,
        mean: Vector3<f64>,
        stddev: Vector3<f64>,
    ) -> Result<(), SensorErrors> {
        let digitize = DigitizeTransform::new(bits, range)?;
        let mut noise = self.noise_transform()?.clone();
        noise.set_parameters(mean, stddev)?;

        *self.digitize_transform_mut()? = digitize;
        *self.noise_transform_mut()? = noise;
        debug!("accelerometer initialized: bits {bits}, range {range:?}, mean {mean:?}, stddev {stddev:?}");
        Ok(())
    }

    pub fn noise_transform(&self) -> Result<&NoiseTransform<Vector3<f64>>, SensorErrors> {
        self.pipeline
            .chain()
            .noise()
            .ok_or(SensorErrors::TransformNotFound(TransformKind::Noise))
    }

    pub fn noise_transform_mut(
        &mut self,
    ) -> Result<&mut NoiseTransform<Vector3<f64>>, SensorErrors> {
        self.pipeline
            .chain_mut()
            .noise_mut()
            .ok_or(SensorErrors::TransformNotFound(TransformKind::Noise))
    }

    pub fn digitize_transform(&self) -> Result<&DigitizeTransform<Vector3<f64>>, SensorErrors> {
        self.pipeline
            .chain()
            .digitize()
            .ok_or(SensorErrors::TransformNotFound(TransformKind::Digitize))
    }

    pub fn digitize_transform_mut(
        &mut self,
    ) -> Result<&mut DigitizeTransform<Vector3<f64>>, SensorErrors> {
        self.pipeline
            .chain_mut()
            .digitize_mut()
            .ok_or(SensorErrors::TransformNotFound(TransformKind::Digitize))
    }

    pub fn set_sample_period(&mut self, sample_period: f64) -> Result<(), SensorErrors> {
        self.pipeline.set_sample_period(sample_period)
    }

    pub fn set_delay(&mut self, delay: f64) -> Result<(), SensorErrors> {
        self.pipeline.set_delay(delay)
    }

    pub fn log_init(&mut self, path: impl AsRef<Path>) -> bool {
        self.pipeline.log_init(path)
    }

    pub fn log(&self, time: f64) -> bool {
        self.pipeline.log(time)
    }

    pub fn pipeline(&self) -> &SensorPipeline<Vector3<f64>> {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut SensorPipeline<Vector3<f64>> {
        &mut self.pipeline
    }
}

impl SensorModel for Accelerometer {
    type Signal = Vector3<f64>;

    fn set_input(&mut self, input: Vector3<f64>) {
        self.pipeline.set_input(input);
    }

    fn output(&self) -> Vector3<f64> {
        self.pipeline.output()
    }

    fn synchronize(&mut self, time: f64) {
        self.pipeline.synchronize(time);
    }

    fn advance(&mut self, step: f64) -> StepActivity {
        self.pipeline.advance(step)
    }
}
