mod commands;
mod helpers;

use clap::Parser;
use satin_core::domain::SatinError;

pub fn run_from_env() -> i32 {
    helpers::init_tracing();

    let remaining: Vec<String> = std::env::args().skip(1).collect();
    match run(remaining) {
        Ok(code) => code,
        Err(error) => {
            let satin_error = error.as_satin_error();
            eprintln!("{}", satin_error.diagnostic_line());
            eprintln!("{}", satin_error.fatal_exit_line());
            satin_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("satin".to_string())
        .chain(args.into_iter().map(Into::into).map(helpers::normalize_legacy_flag))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => commands::run_saturation_command(cli.run),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "satin",
    version,
    about = "Output power of a Gaussian beam through a saturating CO2 amplifier"
)]
struct Cli {
    #[command(flatten)]
    run: commands::RunArgs,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(SatinError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_satin_error(&self) -> SatinError {
        match self {
            Self::Usage(message) => {
                SatinError::input_validation("INPUT.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => SatinError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
