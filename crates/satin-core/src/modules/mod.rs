pub mod dispatch;
pub mod input;
pub mod report;
pub mod serialization;
pub mod worker;

mod traits;

pub use dispatch::{ConcurrentDispatcher, DispatchSummary, write_dispatch_summary};
pub use input::{RunInputs, load_run_inputs};
pub use traits::ReportSink;
pub use worker::{LaserConfigWorker, WorkerOutcome};

use crate::domain::{RunRequest, SatinError, SatinResult};
use crate::numerics::SaturationModel;
use std::fs;

/// Loads both input tables, then runs one worker per laser configuration in the
/// requested mode. Input errors surface before any report is opened.
pub fn execute_run<M>(request: &RunRequest, model: &M) -> SatinResult<DispatchSummary>
where
    M: SaturationModel + ?Sized,
{
    let inputs = load_run_inputs(request)?;

    fs::create_dir_all(&request.output_dir).map_err(|source| {
        SatinError::io_system(
            "IO.OUTPUT_DIR",
            format!(
                "failed to prepare output directory '{}': {}",
                request.output_dir.display(),
                source
            ),
        )
    })?;

    ConcurrentDispatcher::new(model, &request.output_dir).dispatch(
        &inputs.configs,
        &inputs.input_powers,
        request.mode,
    )
}
