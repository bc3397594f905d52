use std::path::Path;

use log::{debug, trace, warn};
use transforms::{SensorTransform, chain::TransformChain, signal::Signal};

use crate::{
    SensorErrors, SensorModel,
    delay::{DelayQueue, has_elapsed},
    logfile::SensorLog,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimingState {
    pub sample_period: f64,
    pub delay: f64,
    pub last_sample_time: f64,
    /// consumed by the next `advance`
    pub sample_due: bool,
    /// the last `advance` moved a sample to the output
    pub released: bool,
}

/// What one `advance` did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepActivity {
    pub sampled: bool,
    /// entries released from the delay queue
    pub released: usize,
}

/// Samples the input at the sample period, runs it through the transform chain,
/// holds it for the transport delay and then presents it as the output.
/// The output is held between releases.
///
/// Each tick the host calls `set_input`, `synchronize(time)` and `advance(step)`
/// in that order.
#[derive(Clone, Debug)]
pub struct SensorPipeline<S: Signal> {
    input: S,
    output: S,
    time: f64,
    timing: TimingState,
    queue: DelayQueue<S>,
    chain: TransformChain<S>,
    log: Option<SensorLog>,
}

impl<S: Signal> SensorPipeline<S> {
    pub fn new(
        sample_period: f64,
        delay: f64,
        chain: TransformChain<S>,
    ) -> Result<Self, SensorErrors> {
        validate_sample_period(sample_period)?;
        validate_delay(delay)?;
        Ok(Self {
            input: S::initial(),
            output: S::initial(),
            time: 0.0,
            timing: TimingState {
                sample_period,
                delay,
                ..Default::default()
            },
            queue: DelayQueue::new(),
            chain,
            log: None,
        })
    }

    pub fn with_sample_period(mut self, sample_period: f64) -> Result<Self, SensorErrors> {
        self.set_sample_period(sample_period)?;
        Ok(self)
    }

    pub fn with_delay(mut self, delay: f64) -> Result<Self, SensorErrors> {
        self.set_delay(delay)?;
        Ok(self)
    }

    pub fn set_sample_period(&mut self, sample_period: f64) -> Result<(), SensorErrors> {
        validate_sample_period(sample_period)?;
        debug!("sample period set to {sample_period}");
        self.timing.sample_period = sample_period;
        Ok(())
    }

    /// Takes effect on entries already queued
    pub fn set_delay(&mut self, delay: f64) -> Result<(), SensorErrors> {
        validate_delay(delay)?;
        debug!("delay set to {delay}");
        self.timing.delay = delay;
        Ok(())
    }

    pub fn set_input(&mut self, input: S) {
        self.input = input;
    }

    pub fn input(&self) -> S {
        self.input
    }

    pub fn output(&self) -> S {
        self.output
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn sample_period(&self) -> f64 {
        self.timing.sample_period
    }

    pub fn delay(&self) -> f64 {
        self.timing.delay
    }

    pub fn last_sample_time(&self) -> f64 {
        self.timing.last_sample_time
    }

    pub fn is_sample_due(&self) -> bool {
        self.timing.sample_due
    }

    pub fn was_released(&self) -> bool {
        self.timing.released
    }

    pub fn timing(&self) -> &TimingState {
        &self.timing
    }

    /// Number of samples waiting out the delay
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn chain(&self) -> &TransformChain<S> {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut TransformChain<S> {
        &mut self.chain
    }

    /// Moves the pipeline clock to `time` and decides whether the next `advance` samples
    pub fn synchronize(&mut self, time: f64) {
        if !time.is_finite() {
            warn!("ignoring non-finite synchronize time {time}");
            return;
        }
        self.time = time;
        let due = has_elapsed(time, self.timing.last_sample_time, self.timing.sample_period);
        if due {
            self.timing.last_sample_time = time;
        }
        self.timing.sample_due = due;
    }

    pub fn advance(&mut self, step: f64) -> StepActivity {
        let mut activity = StepActivity::default();

        if self.timing.sample_due {
            let acquired = self.chain.evaluate(&self.input);
            self.queue.push(self.time, acquired);
            self.timing.sample_due = false;
            activity.sampled = true;
            trace!("sampled at {}", self.time);
        }

        while let Some(value) = self.queue.pop_due(self.time, self.timing.delay) {
            self.output = value;
            activity.released += 1;
        }
        self.timing.released = activity.released > 0;
        if self.timing.released {
            trace!("released {} at {}", activity.released, self.time);
        }

        if step.is_finite() && step >= 0.0 {
            self.time += step;
        } else {
            warn!("ignoring invalid step {step}");
        }

        activity
    }

    /// Creates (or truncates) the log file and writes the header
    pub fn log_init(&mut self, path: impl AsRef<Path>) -> bool {
        match SensorLog::create(path.as_ref()) {
            Ok(log) => {
                self.log = Some(log);
                true
            }
            Err(e) => {
                warn!("could not create sensor log {}: {e}", path.as_ref().display());
                self.log = None;
                false
            }
        }
    }

    /// Appends the current input and output
    pub fn log(&self, time: f64) -> bool {
        let Some(log) = &self.log else {
            warn!("sensor log written before log_init");
            return false;
        };
        match log.record(time, &self.input, &self.output) {
            Ok(()) => true,
            Err(e) => {
                warn!("could not write sensor log {}: {e}", log.path().display());
                false
            }
        }
    }
}

fn validate_sample_period(sample_period: f64) -> Result<(), SensorErrors> {
    if !sample_period.is_finite() || sample_period < 0.0 {
        return Err(SensorErrors::InvalidSamplePeriod(sample_period));
    }
    Ok(())
}

fn validate_delay(delay: f64) -> Result<(), SensorErrors> {
    if !delay.is_finite() || delay < 0.0 {
        return Err(SensorErrors::InvalidDelay(delay));
    }
    Ok(())
}

impl<S: Signal> SensorModel for SensorPipeline<S> {
    type Signal = S;

    fn set_input(&mut self, input: S) {
        SensorPipeline::set_input(self, input);
    }

    fn output(&self) -> S {
        SensorPipeline::output(self)
    }

    fn synchronize(&mut self, time: f64) {
        SensorPipeline::synchronize(self, time);
    }

    fn advance(&mut self, step: f64) -> StepActivity {
        SensorPipeline::advance(self, step)
    }
}
