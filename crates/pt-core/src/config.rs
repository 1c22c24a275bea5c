//! Configuration types and parsing for proctor.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::{default_max_rendered_mismatches, default_row_count};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Validation settings, fixed for the lifetime of one orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Synthetic rows generated per table
    #[serde(default = "default_row_count")]
    pub row_count: usize,

    /// Seed for synthetic data; a fresh seed is drawn (and reported) when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Deadline for a single candidate run (clear, seed, execute, validate)
    #[serde(default)]
    pub run_timeout_secs: Option<u64>,

    /// Cell mismatches shown in the rendered comparison summary
    #[serde(default = "default_max_rendered_mismatches")]
    pub max_rendered_mismatches: usize,

    /// Error-logging helpers replaced with a re-raise in executable blocks
    #[serde(default)]
    pub error_log_helpers: Vec<String>,

    /// Status/print helpers replaced with a no-op in executable blocks
    #[serde(default)]
    pub status_helpers: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            row_count: default_row_count(),
            seed: None,
            run_timeout_secs: None,
            max_rendered_mismatches: default_max_rendered_mismatches(),
            error_log_helpers: Vec::new(),
            status_helpers: Vec::new(),
        }
    }
}

impl ValidationConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: ValidationConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.row_count == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "row_count must be greater than zero".to_string(),
            });
        }

        if self.run_timeout_secs == Some(0) {
            return Err(CoreError::ConfigInvalid {
                message: "run_timeout_secs must be greater than zero when set".to_string(),
            });
        }

        if let Some(blank) = self
            .error_log_helpers
            .iter()
            .chain(&self.status_helpers)
            .find(|h| h.trim().is_empty())
        {
            return Err(CoreError::ConfigInvalid {
                message: format!("helper names must not be blank (got {blank:?})"),
            });
        }

        Ok(())
    }

    /// Per-run deadline, if configured
    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }

    /// Override the row count
    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = row_count;
        self
    }

    /// Override the synthetic data seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// SQL dialect that generated scripts are rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Oracle PL/SQL anonymous blocks
    Oracle,
    /// DuckDB plain SQL batches
    #[default]
    DuckDb,
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::Oracle => write!(f, "oracle"),
            SqlDialect::DuckDb => write!(f, "duckdb"),
        }
    }
}

impl FromStr for SqlDialect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "oracle" => Ok(SqlDialect::Oracle),
            "duckdb" => Ok(SqlDialect::DuckDb),
            other => Err(CoreError::ConfigInvalid {
                message: format!("unknown dialect '{other}', expected 'oracle' or 'duckdb'"),
            }),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
