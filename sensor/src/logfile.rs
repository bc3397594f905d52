use std::{
    fs::{File, OpenOptions},
    io::BufWriter,
    path::{Path, PathBuf},
};

use csv::{Writer, WriterBuilder};
use thiserror::Error;
use transforms::signal::Signal;

pub type LogWriter = Writer<BufWriter<File>>;

pub const LOG_HEADERS: [&str; 3] = ["Time", " Input", " Output"];

#[derive(Debug, Error)]
pub enum SensorLogErrors {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// Text log of `Time, Input, Output` rows.
/// The file is truncated by `create` and reopened in append mode by every `record`.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorLog {
    path: PathBuf,
}

impl SensorLog {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SensorLogErrors> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let mut writer = writer(file);
        writer.write_record(LOG_HEADERS)?;
        writer.flush()?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record<S: Signal>(
        &self,
        time: f64,
        input: &S,
        output: &S,
    ) -> Result<(), SensorLogErrors> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = writer(file);
        writer.write_record([
            time.to_string(),
            format!(" {}", input.to_field()),
            format!(" {}", output.to_field()),
        ])?;
        writer.flush()?;
        Ok(())
    }
}

fn writer(file: File) -> LogWriter {
    WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::{ReaderBuilder, Trim};
    use nalgebra::Vector3;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sensor_log_{}_{}.csv", name, std::process::id()))
    }

    #[test]
    fn test_log_header_and_rows() {
        let path = temp_path("rows");
        let log = SensorLog::create(&path).unwrap();
        log.record(0.5, &1.25, &1.0).unwrap();
        log.record(1.0, &2.5, &1.25).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Time, Input, Output", "0.5, 1.25, 1", "1, 2.5, 1.25"]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_log_reads_back_trimmed() {
        let path = temp_path("vector");
        let log = SensorLog::create(&path).unwrap();
        log.record(0.25, &Vector3::new(1.0, 2.0, 3.0), &Vector3::zeros())
            .unwrap();

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(&path).unwrap();
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, vec!["Time", "Input", "Output"]);

        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "0.25");
        assert_eq!(&row[1], "1 2 3");
        assert_eq!(&row[2], "0 0 0");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_log_create_truncates() {
        let path = temp_path("truncate");
        let log = SensorLog::create(&path).unwrap();
        log.record(1.0, &1.0, &1.0).unwrap();
        SensorLog::create(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_log_unopenable_path() {
        let path = std::env::temp_dir()
            .join("sensor_log_missing_directory")
            .join("log.csv");
        assert!(matches!(SensorLog::create(&path), Err(SensorLogErrors::Io(_))));
    }
}
