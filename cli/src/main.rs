use std::{f64::consts::TAU, path::PathBuf, process::ExitCode};

use clap::Parser;
use log::{error, info};
use nalgebra::Vector3;
use sensor::{SensorErrors, SensorModel, config::AccelerometerBuilder};
use thiserror::Error;

const GRAVITY: f64 = 9.80665;

#[derive(Debug, Parser)]
#[command(version, about = "Runs an emulated accelerometer against a synthetic input", long_about = None)]
struct Cli {
    /// RON accelerometer config, replaces the sensor flags below
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 0.01)]
    sample_period: f64,
    #[arg(long, default_value_t = 0.05)]
    delay: f64,
    #[arg(long, default_value_t = 12.0)]
    bits: f64,
    /// full scale range on every axis
    #[arg(long, default_value_t = 50.0)]
    range: f64,
    #[arg(long, default_value_t = 0.0)]
    mean: f64,
    #[arg(long, default_value_t = 0.1)]
    stddev: f64,
    #[arg(long)]
    seed: Option<u64>,
    /// simulated seconds
    #[arg(long, default_value_t = 1.0)]
    duration: f64,
    /// host step size
    #[arg(long, default_value_t = 0.001)]
    step: f64,
    #[arg(short, long, default_value = "accelerometer.csv")]
    log: PathBuf,
}

#[derive(Debug, Error)]
enum CliErrors {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Sensor(#[from] SensorErrors),
    #[error("step must be finite and positive, got {0}")]
    InvalidStep(f64),
    #[error("duration must be finite and non-negative, got {0}")]
    InvalidDuration(f64),
    #[error("could not write log {0:?}")]
    Log(PathBuf),
}

impl Cli {
    fn builder(&self) -> Result<AccelerometerBuilder, CliErrors> {
        match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok(AccelerometerBuilder::from_ron(&text)?)
            }
            None => Ok(AccelerometerBuilder {
                sample_period: self.sample_period,
                delay: self.delay,
                bits: self.bits,
                range: Vector3::repeat(self.range),
                noise_mean: Vector3::repeat(self.mean),
                noise_stddev: Vector3::repeat(self.stddev),
                seed: self.seed,
            }),
        }
    }
}

/// Gravity on z plus a vibration on x and y
fn synthetic_input(t: f64) -> Vector3<f64> {
    Vector3::new(
        0.5 * (TAU * 2.0 * t).sin(),
        0.2 * (TAU * 5.0 * t).cos(),
        GRAVITY,
    )
}

fn run(cli: &Cli) -> Result<usize, CliErrors> {
    if !cli.step.is_finite() || cli.step <= 0.0 {
        return Err(CliErrors::InvalidStep(cli.step));
    }
    if !cli.duration.is_finite() || cli.duration < 0.0 {
        return Err(CliErrors::InvalidDuration(cli.duration));
    }

    let mut accelerometer = cli.builder()?.build()?;
    if !accelerometer.log_init(&cli.log) {
        return Err(CliErrors::Log(cli.log.clone()));
    }

    let steps = (cli.duration / cli.step).round() as usize;
    for i in 0..=steps {
        let t = i as f64 * cli.step;
        accelerometer.step(synthetic_input(t), t, cli.step);
        if !accelerometer.log(t) {
            return Err(CliErrors::Log(cli.log.clone()));
        }
    }
    Ok(steps + 1)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(rows) => {
            info!("wrote {rows} rows to {}", cli.log.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["sensor_cli"]).unwrap();
        assert_eq!(cli.sample_period, 0.01);
        assert_eq!(cli.delay, 0.05);
        assert!(cli.config.is_none());

        let builder = cli.builder().unwrap();
        assert_eq!(builder.range, Vector3::repeat(50.0));
        assert_eq!(builder.bits, 12.0);
    }

    #[test]
    fn test_cli_rejects_bad_step() {
        let cli = Cli::try_parse_from(["sensor_cli", "--step", "0"]).unwrap();
        assert!(matches!(run(&cli), Err(CliErrors::InvalidStep(_))));
    }

    #[test]
    fn test_cli_run_writes_log() {
        let path = std::env::temp_dir().join(format!("sensor_cli_{}.csv", std::process::id()));
        let cli = Cli::try_parse_from([
            "sensor_cli",
            "--duration",
            "0.1",
            "--step",
            "0.01",
            "--seed",
            "4",
            "--log",
            path.to_str().unwrap(),
        ])
        .unwrap();

        let rows = run(&cli).unwrap();
        assert_eq!(rows, 11);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), rows + 1);
        assert_eq!(text.lines().next(), Some("Time, Input, Output"));
        std::fs::remove_file(&path).unwrap();
    }
}
