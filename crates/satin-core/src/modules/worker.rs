use super::ReportSink;
use super::report::ReportWriter;
use crate::domain::{LaserConfig, SatinResult};
use crate::numerics::SaturationModel;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What one worker produced for its laser configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerOutcome {
    pub output_file: String,
    pub report_path: PathBuf,
    pub power_count: usize,
    pub result_count: usize,
    #[serde(rename = "elapsed_seconds", serialize_with = "serialize_seconds")]
    pub elapsed: Duration,
}

/// Runs the saturation sweep over every input power for one laser configuration.
#[derive(Debug)]
pub struct LaserConfigWorker<'a, M: ?Sized> {
    config: &'a LaserConfig,
    input_powers: &'a [i32],
    model: &'a M,
}

impl<'a, M> LaserConfigWorker<'a, M>
where
    M: SaturationModel + ?Sized,
{
    pub fn new(config: &'a LaserConfig, input_powers: &'a [i32], model: &'a M) -> Self {
        Self {
            config,
            input_powers,
            model,
        }
    }

    /// Streams results to `sink` in input-power order and returns how many
    /// result rows were written.
    pub fn run<S: ReportSink>(&self, mut sink: S) -> SatinResult<usize> {
        let gain = self.config.small_signal_gain();
        let mut result_count = 0;
        for &input_power in self.input_powers {
            let results = self.model.integrate(input_power, gain);
            sink.write_results(&results)?;
            result_count += results.len();
        }
        Ok(result_count)
    }

    /// Writes the report for this configuration into `output_dir`. The report
    /// file is released on every return path.
    pub fn run_to_file(&self, output_dir: &Path) -> SatinResult<WorkerOutcome> {
        let started = Instant::now();
        let report_path = output_dir.join(self.config.output_file());
        tracing::debug!(
            report = %report_path.display(),
            powers = self.input_powers.len(),
            "worker started"
        );

        let mut writer = ReportWriter::create(&report_path, self.config)?;
        let result_count = self.run(&mut writer)?;
        writer.close()?;

        let elapsed = started.elapsed();
        tracing::info!(
            report = %report_path.display(),
            results = result_count,
            elapsed_seconds = elapsed.as_secs_f64(),
            "worker finished"
        );

        Ok(WorkerOutcome {
            output_file: self.config.output_file().to_string(),
            report_path,
            power_count: self.input_powers.len(),
            result_count,
            elapsed,
        })
    }
}

fn serialize_seconds<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(elapsed.as_secs_f64())
}
