use super::CliError;
use super::helpers::{current_working_dir, resolve_against};
use satin_core::domain::{DispatchMode, LASER_INPUT, PIN_INPUT, RunRequest};
use satin_core::modules::{execute_run, write_dispatch_summary};
use satin_core::numerics::GaussianBeamModel;
use std::path::PathBuf;
use std::time::Instant;

#[derive(clap::Args, Debug)]
pub(super) struct RunArgs {
    /// Run the laser configurations one after another on the calling thread
    #[arg(long)]
    single: bool,

    /// Input power table, one positive integer per entry
    #[arg(long, value_name = "path", default_value = PIN_INPUT)]
    pin: PathBuf,

    /// Laser configuration table: <report> <gain> <pressure> <CO2> per line
    #[arg(long, value_name = "path", default_value = LASER_INPUT)]
    laser: PathBuf,

    /// Directory the per-configuration reports are written into
    #[arg(long, value_name = "dir", default_value = ".")]
    output_dir: PathBuf,

    /// Also write a JSON summary of the run to this path
    #[arg(long, value_name = "path")]
    summary: Option<PathBuf>,
}

impl RunArgs {
    fn mode(&self) -> DispatchMode {
        if self.single {
            DispatchMode::Sequential
        } else {
            DispatchMode::Concurrent
        }
    }

    fn into_request(self, working_dir: &std::path::Path) -> (RunRequest, Option<PathBuf>) {
        let mode = self.mode();
        let request = RunRequest::new(
            resolve_against(working_dir, &self.pin),
            resolve_against(working_dir, &self.laser),
            resolve_against(working_dir, &self.output_dir),
        )
        .with_mode(mode);
        let summary = self
            .summary
            .map(|path| resolve_against(working_dir, &path));
        (request, summary)
    }
}

pub(super) fn run_saturation_command(args: RunArgs) -> Result<i32, CliError> {
    let started = Instant::now();
    let working_dir = current_working_dir()?;
    let (request, summary_path) = args.into_request(&working_dir);
    tracing::info!(
        mode = %request.mode,
        pin = %request.pin_path.display(),
        laser = %request.laser_path.display(),
        output_dir = %request.output_dir.display(),
        "starting saturation run"
    );

    let summary = execute_run(&request, &GaussianBeamModel).map_err(CliError::Compute)?;
    if let Some(path) = summary_path {
        write_dispatch_summary(&path, &summary).map_err(CliError::Compute)?;
        tracing::info!(summary = %path.display(), "wrote run summary");
    }

    let elapsed = started.elapsed().as_secs_f64();
    tracing::info!(
        completed = summary.completed,
        workers = summary.worker_count,
        elapsed_seconds = elapsed,
        "saturation run finished"
    );
    println!("The time was {:.3} seconds.", elapsed);
    Ok(0)
}
