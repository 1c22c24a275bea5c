//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use pt_core::ValidationConfig;
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "proctor.yml";

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main exits with the code without printing.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the config named by `--config`, else `./proctor.yml`, else defaults.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<ValidationConfig> {
    match &global.config {
        Some(path) => ValidationConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}")),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            ValidationConfig::load(Path::new(DEFAULT_CONFIG_FILE))
                .with_context(|| format!("Failed to load {DEFAULT_CONFIG_FILE}"))
        }
        None => Ok(ValidationConfig::default()),
    }
}

/// Apply command-line overrides on top of the loaded config.
pub(crate) fn apply_overrides(
    mut config: ValidationConfig,
    rows: Option<usize>,
    seed: Option<u64>,
) -> ValidationConfig {
    if let Some(rows) = rows {
        config = config.with_row_count(rows);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config
}

/// Read a text input file
pub(crate) fn read_input(path: &str, what: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {what} file {path}"))
}

/// Print a message to stderr when `--verbose` is set
pub(crate) fn verbose(global: &GlobalArgs, msg: &str) {
    if global.verbose {
        eprintln!("[verbose] {msg}");
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
