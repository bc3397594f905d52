pub mod accelerometer;
pub mod config;
pub mod delay;
pub mod logfile;
pub mod pipeline;

use thiserror::Error;
use transforms::{TransformErrors, TransformKind, signal::Signal};

use crate::pipeline::StepActivity;

pub mod prelude {
    pub use crate::accelerometer::*;
    pub use crate::config::*;
    pub use crate::delay::*;
    pub use crate::logfile::*;
    pub use crate::pipeline::*;
    pub use crate::{SensorErrors, SensorModel};
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorErrors {
    #[error("sample period must be finite and non-negative, got {0}")]
    InvalidSamplePeriod(f64),
    #[error("delay must be finite and non-negative, got {0}")]
    InvalidDelay(f64),
    #[error("{0}")]
    Transform(#[from] TransformErrors),
    #[error("no {0:?} transform in the chain")]
    TransformNotFound(TransformKind),
    #[error("{0}")]
    Config(#[from] ron::error::SpannedError),
}

/// What the host sees of a sensor each tick
pub trait SensorModel {
    type Signal: Signal;

    fn set_input(&mut self, input: Self::Signal);
    fn output(&self) -> Self::Signal;
    fn synchronize(&mut self, time: f64);
    fn advance(&mut self, step: f64) -> StepActivity;

    /// One host tick: set the input, synchronize to `time`, advance by `step`
    fn step(&mut self, input: Self::Signal, time: f64, step: f64) -> Self::Signal {
        self.set_input(input);
        self.synchronize(time);
        self.advance(step);
        self.output()
    }
}
