use anyhow::Context;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";
const LEGACY_SINGLE_FLAG: &str = "-single";

/// Logs go to stderr; stdout carries only the elapsed-time line.
pub(super) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

/// The historical command line selected sequential mode with a single-dash
/// long flag, which clap would read as a cluster of short flags.
pub(super) fn normalize_legacy_flag(arg: String) -> String {
    if arg == LEGACY_SINGLE_FLAG {
        "--single".to_string()
    } else {
        arg
    }
}

/// Anchors relative paths at the working directory so log lines and the run
/// summary name the files unambiguously.
pub(super) fn resolve_against(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

pub(super) fn current_working_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("failed to resolve working directory")
}
