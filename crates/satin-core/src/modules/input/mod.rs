mod parser;

pub use parser::{
    ParseStop, ParseStopReason, ParsedInput, parse_input_powers, parse_laser_configs,
};

use crate::domain::{LaserConfig, RunRequest, SatinError, SatinResult};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Input powers and laser configurations shared read-only by every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct RunInputs {
    pub input_powers: Vec<i32>,
    pub configs: Vec<LaserConfig>,
}

pub fn load_run_inputs(request: &RunRequest) -> SatinResult<RunInputs> {
    let input_powers = load_input_powers(&request.pin_path)?;
    let configs = load_laser_configs(&request.laser_path)?;

    if input_powers.is_empty() {
        return Err(SatinError::input_validation(
            "INPUT.PIN_EMPTY",
            format!(
                "no input powers could be read from '{}'",
                request.pin_path.display()
            ),
        ));
    }
    if configs.is_empty() {
        return Err(SatinError::input_validation(
            "INPUT.LASER_EMPTY",
            format!(
                "no laser configurations could be read from '{}'",
                request.laser_path.display()
            ),
        ));
    }
    validate_unique_outputs(&configs, &request.laser_path)?;

    Ok(RunInputs {
        input_powers,
        configs,
    })
}

pub fn load_input_powers(path: &Path) -> SatinResult<Vec<i32>> {
    let source = read_input_source(path)?;
    let parsed = parse_input_powers(&source)?;
    log_parse_outcome(path, &parsed);
    Ok(parsed.records)
}

pub fn load_laser_configs(path: &Path) -> SatinResult<Vec<LaserConfig>> {
    let source = read_input_source(path)?;
    let parsed = parse_laser_configs(&source)?;
    log_parse_outcome(path, &parsed);
    Ok(parsed.records)
}

fn read_input_source(path: &Path) -> SatinResult<String> {
    fs::read_to_string(path).map_err(|source| {
        SatinError::io_system(
            "IO.INPUT_READ",
            format!("failed to read input '{}': {}", path.display(), source),
        )
    })
}

fn log_parse_outcome<T>(path: &Path, parsed: &ParsedInput<T>) {
    if let Some(stop) = &parsed.stopped_at {
        tracing::warn!(
            input = %path.display(),
            line = stop.line,
            reason = %stop.reason,
            "stopped reading input at malformed entry"
        );
    }
    tracing::info!(
        input = %path.display(),
        records = parsed.records.len(),
        "parsed input records"
    );
}

fn validate_unique_outputs(configs: &[LaserConfig], laser_path: &Path) -> SatinResult<()> {
    let mut seen = BTreeSet::new();
    for config in configs {
        if !seen.insert(config.output_file()) {
            return Err(SatinError::input_validation(
                "INPUT.LASER_DUPLICATE_OUTPUT",
                format!(
                    "report '{}' is named by more than one configuration in '{}'",
                    config.output_file(),
                    laser_path.display()
                ),
            ));
        }
    }
    Ok(())
}
