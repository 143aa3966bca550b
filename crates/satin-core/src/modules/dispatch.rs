use super::serialization::write_text_artifact;
use super::worker::{LaserConfigWorker, WorkerOutcome};
use crate::domain::{DispatchMode, LaserConfig, SatinError, SatinResult};
use crate::numerics::SaturationModel;
use rayon::prelude::*;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchSummary {
    pub mode: DispatchMode,
    pub worker_count: usize,
    pub completed: usize,
    pub outcomes: Vec<WorkerOutcome>,
}

/// Fans out one [`LaserConfigWorker`] per laser configuration and waits for all
/// of them.
///
/// Workers share only the input powers and the model, both read-only; each one
/// owns its report file.
#[derive(Debug)]
pub struct ConcurrentDispatcher<'a, M: ?Sized> {
    model: &'a M,
    output_dir: PathBuf,
}

impl<'a, M> ConcurrentDispatcher<'a, M>
where
    M: SaturationModel + ?Sized,
{
    pub fn new(model: &'a M, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            model,
            output_dir: output_dir.into(),
        }
    }

    pub fn dispatch(
        &self,
        configs: &[LaserConfig],
        input_powers: &[i32],
        mode: DispatchMode,
    ) -> SatinResult<DispatchSummary> {
        tracing::info!(
            mode = %mode,
            workers = configs.len(),
            powers = input_powers.len(),
            "dispatching laser configurations"
        );

        let completed = AtomicUsize::new(0);
        let outcomes = match mode {
            DispatchMode::Sequential => self.run_sequential(configs, input_powers, &completed)?,
            DispatchMode::Concurrent => self.run_concurrent(configs, input_powers, &completed)?,
        };

        Ok(DispatchSummary {
            mode,
            worker_count: configs.len(),
            completed: completed.load(Ordering::SeqCst),
            outcomes,
        })
    }

    fn run_sequential(
        &self,
        configs: &[LaserConfig],
        input_powers: &[i32],
        completed: &AtomicUsize,
    ) -> SatinResult<Vec<WorkerOutcome>> {
        let mut outcomes = Vec::with_capacity(configs.len());
        for config in configs {
            outcomes.push(self.run_worker(config, input_powers, completed)?);
        }
        Ok(outcomes)
    }

    fn run_concurrent(
        &self,
        configs: &[LaserConfig],
        input_powers: &[i32],
        completed: &AtomicUsize,
    ) -> SatinResult<Vec<WorkerOutcome>> {
        if configs.is_empty() {
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(configs.len())
            .thread_name(|index| format!("satin-worker-{index}"))
            .build()
            .map_err(|source| {
                SatinError::concurrency(
                    "RUN.WORKER_POOL",
                    format!(
                        "failed to start {} laser workers: {}",
                        configs.len(),
                        source
                    ),
                )
            })?;

        let results: Vec<SatinResult<WorkerOutcome>> = pool.install(|| {
            configs
                .par_iter()
                .with_max_len(1)
                .map(|config| self.join_worker(config, input_powers, completed))
                .collect()
        });

        collect_outcomes(results)
    }

    /// Runs a worker and turns a panic inside it into a join failure so the
    /// remaining workers still reach the barrier.
    fn join_worker(
        &self,
        config: &LaserConfig,
        input_powers: &[i32],
        completed: &AtomicUsize,
    ) -> SatinResult<WorkerOutcome> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_worker(config, input_powers, completed)
        }))
        .unwrap_or_else(|payload| {
            Err(SatinError::concurrency(
                "RUN.WORKER_JOIN",
                format!(
                    "worker for '{}' did not complete: {}",
                    config.output_file(),
                    panic_message(payload.as_ref())
                ),
            ))
        })
    }

    fn run_worker(
        &self,
        config: &LaserConfig,
        input_powers: &[i32],
        completed: &AtomicUsize,
    ) -> SatinResult<WorkerOutcome> {
        let outcome =
            LaserConfigWorker::new(config, input_powers, self.model).run_to_file(&self.output_dir)?;
        completed.fetch_add(1, Ordering::SeqCst);
        Ok(outcome)
    }
}

/// Writes the summary as pretty-printed JSON.
pub fn write_dispatch_summary(path: &Path, summary: &DispatchSummary) -> SatinResult<()> {
    let json = serde_json::to_string_pretty(summary).map_err(|source| {
        SatinError::io_system(
            "IO.SUMMARY_WRITE",
            format!("failed to encode run summary: {}", source),
        )
    })?;
    write_text_artifact(path, &json).map_err(|source| {
        SatinError::io_system(
            "IO.SUMMARY_WRITE",
            format!(
                "failed to write run summary '{}': {}",
                path.display(),
                source
            ),
        )
    })
}

fn collect_outcomes(results: Vec<SatinResult<WorkerOutcome>>) -> SatinResult<Vec<WorkerOutcome>> {
    let mut outcomes = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(error) => failures.push(error),
        }
    }

    match SatinError::aggregate(failures) {
        Some(error) => Err(error),
        None => Ok(outcomes),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConcurrentDispatcher, collect_outcomes, write_dispatch_summary};
    use crate::domain::{
        DispatchMode, GaussianResult, LaserConfig, SatinError, SatinErrorCategory,
    };
    use crate::numerics::{SaturationModel, SaturationSweep, SaturationSweepResults};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingModel {
        calls: AtomicUsize,
    }

    impl SaturationModel for CountingModel {
        fn integrate(&self, input_power: i32, small_signal_gain: f32) -> SaturationSweepResults {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let sweep = SaturationSweep::default();
            std::array::from_fn(|step| {
                let saturation_intensity = sweep.intensity_at(step);
                GaussianResult::new(
                    input_power,
                    saturation_intensity,
                    f64::from(input_power)
                        * (1.0 + f64::from(small_signal_gain) * f64::from(saturation_intensity) * 1.0e-6),
                )
            })
        }
    }

    struct PanickingModel;

    impl SaturationModel for PanickingModel {
        fn integrate(&self, _input_power: i32, small_signal_gain: f32) -> SaturationSweepResults {
            if small_signal_gain > 50.0 {
                panic!("gain out of range");
            }
            CountingModel::default().integrate(1, small_signal_gain)
        }
    }

    fn configs(count: usize) -> Vec<LaserConfig> {
        (0..count)
            .map(|index| {
                LaserConfig::new(format!("c{index}.out"), 5.0 + index as f32, 100, "MD")
                    .expect("valid config")
            })
            .collect()
    }

    fn strip_timestamps(report: &str) -> String {
        report
            .lines()
            .filter(|line| !line.starts_with("Start date:") && !line.starts_with("End date:"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn concurrent_dispatch_completes_one_worker_per_config() {
        let temp = TempDir::new().expect("tempdir should be created");
        let model = CountingModel::default();
        let configs = configs(6);
        let powers = [10, 20, 30];

        let summary = ConcurrentDispatcher::new(&model, temp.path())
            .dispatch(&configs, &powers, DispatchMode::Concurrent)
            .expect("dispatch should succeed");

        assert_eq!(summary.mode, DispatchMode::Concurrent);
        assert_eq!(summary.worker_count, 6);
        assert_eq!(summary.completed, 6);
        assert_eq!(summary.outcomes.len(), 6);
        assert_eq!(model.calls.load(Ordering::SeqCst), 6 * 3);
        for config in &configs {
            assert!(temp.path().join(config.output_file()).is_file());
        }
    }

    #[test]
    fn sequential_dispatch_runs_workers_in_config_order() {
        let temp = TempDir::new().expect("tempdir should be created");
        let model = CountingModel::default();
        let configs = configs(3);

        let summary = ConcurrentDispatcher::new(&model, temp.path())
            .dispatch(&configs, &[10], DispatchMode::Sequential)
            .expect("dispatch should succeed");

        let names: Vec<&str> = summary
            .outcomes
            .iter()
            .map(|outcome| outcome.output_file.as_str())
            .collect();
        assert_eq!(names, vec!["c0.out", "c1.out", "c2.out"]);
        assert_eq!(summary.completed, 3);
    }

    #[test]
    fn sequential_and_concurrent_reports_match_apart_from_timestamps() {
        let temp = TempDir::new().expect("tempdir should be created");
        let sequential_dir = temp.path().join("sequential");
        let concurrent_dir = temp.path().join("concurrent");
        fs::create_dir_all(&sequential_dir).expect("sequential dir should exist");
        fs::create_dir_all(&concurrent_dir).expect("concurrent dir should exist");

        let model = CountingModel::default();
        let configs = configs(4);
        let powers = [5, 50, 500];

        ConcurrentDispatcher::new(&model, &sequential_dir)
            .dispatch(&configs, &powers, DispatchMode::Sequential)
            .expect("sequential dispatch should succeed");
        ConcurrentDispatcher::new(&model, &concurrent_dir)
            .dispatch(&configs, &powers, DispatchMode::Concurrent)
            .expect("concurrent dispatch should succeed");

        for config in &configs {
            let sequential = fs::read_to_string(sequential_dir.join(config.output_file()))
                .expect("sequential report should exist");
            let concurrent = fs::read_to_string(concurrent_dir.join(config.output_file()))
                .expect("concurrent report should exist");
            assert_eq!(strip_timestamps(&sequential), strip_timestamps(&concurrent));
        }
    }

    #[test]
    fn empty_config_list_completes_without_workers() {
        let temp = TempDir::new().expect("tempdir should be created");
        let model = CountingModel::default();

        let summary = ConcurrentDispatcher::new(&model, temp.path())
            .dispatch(&[], &[10], DispatchMode::Concurrent)
            .expect("dispatch should succeed");
        assert_eq!(summary.worker_count, 0);
        assert_eq!(summary.completed, 0);
    }

    #[test]
    fn worker_failure_fails_the_dispatch_after_the_barrier() {
        let temp = TempDir::new().expect("tempdir should be created");
        let model = CountingModel::default();
        let missing = temp.path().join("missing");

        let error = ConcurrentDispatcher::new(&model, &missing)
            .dispatch(&configs(3), &[10], DispatchMode::Concurrent)
            .expect_err("dispatch should fail");

        assert_eq!(error.category(), SatinErrorCategory::IoSystemError);
        assert_eq!(error.placeholder(), "IO.REPORT_CREATE");
        assert!(error.message().starts_with("3 laser workers failed"));
        for index in 0..3 {
            assert!(error.message().contains(&format!("c{index}.out")));
        }
    }

    #[test]
    fn panicking_worker_is_reported_as_join_failure() {
        let temp = TempDir::new().expect("tempdir should be created");
        let configs = vec![
            LaserConfig::new("ok.out", 10.0, 100, "MD").expect("valid config"),
            LaserConfig::new("bad.out", 90.0, 100, "MD").expect("valid config"),
        ];

        let error = ConcurrentDispatcher::new(&PanickingModel, temp.path())
            .dispatch(&configs, &[10], DispatchMode::Concurrent)
            .expect_err("panicking worker should fail the dispatch");

        assert_eq!(error.category(), SatinErrorCategory::ConcurrencyError);
        assert_eq!(error.placeholder(), "RUN.WORKER_JOIN");
        assert!(error.message().contains("bad.out"));
        assert!(error.message().contains("gain out of range"));
        assert!(temp.path().join("ok.out").is_file());
    }

    #[test]
    fn single_failure_is_returned_unchanged() {
        let error = SatinError::io_system("IO.REPORT_CLOSE", "failed to close report 'a.out'");
        let collected = collect_outcomes(vec![Err(error.clone())]).expect_err("should fail");
        assert_eq!(collected, error);
    }

    #[test]
    fn summary_is_written_as_json() {
        let temp = TempDir::new().expect("tempdir should be created");
        let model = CountingModel::default();
        let summary = ConcurrentDispatcher::new(&model, temp.path())
            .dispatch(&configs(2), &[10, 20], DispatchMode::Sequential)
            .expect("dispatch should succeed");

        let path = temp.path().join("summary.json");
        write_dispatch_summary(&path, &summary).expect("summary should write");

        let text = fs::read_to_string(&path).expect("summary should exist");
        let json: serde_json::Value = serde_json::from_str(&text).expect("summary should be json");
        assert_eq!(json["mode"], "sequential");
        assert_eq!(json["worker_count"], 2);
        assert_eq!(json["completed"], 2);
        assert_eq!(json["outcomes"][1]["output_file"], "c1.out");
        assert_eq!(json["outcomes"][0]["result_count"], 32);
        assert!(json["outcomes"][0]["elapsed_seconds"].is_f64());
    }
}
