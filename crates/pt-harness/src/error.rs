//! Error types for pt-harness

use pt_core::CoreError;
use pt_db::DbError;
use pt_seed::SeedError;
use pt_sql::SqlError;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which procedure a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Candidate {
    Original,
    Optimized,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Original => write!(f, "original"),
            Candidate::Optimized => write!(f, "optimized"),
        }
    }
}

/// Step of a candidate run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStep {
    Begin,
    Clear,
    Seed,
    Execute,
    Validate,
    Rollback,
}

impl fmt::Display for RunStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStep::Begin => "begin",
            RunStep::Clear => "clear",
            RunStep::Seed => "seed",
            RunStep::Execute => "execute",
            RunStep::Validate => "validate",
            RunStep::Rollback => "rollback",
        };
        f.write_str(name)
    }
}

/// Validation errors
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Analysis plan lacks a required part (H001)
    #[error("[H001] Incomplete analysis plan: {message}")]
    IncompletePlan { message: String },

    /// Schema description unusable (H002)
    #[error("[H002] Invalid schema: {message}")]
    InvalidSchema { message: String },

    /// Tables cannot be cleared in any order (H003)
    #[error("[H003] {candidate} run cannot clear tables, circular foreign keys between: {}", tables.join(", "))]
    CyclicDependency {
        candidate: Candidate,
        tables: Vec<String>,
    },

    /// SQL failure during a run (H004)
    #[error("[H004] {candidate} run failed at {step} step: {source}")]
    Execution {
        candidate: Candidate,
        step: RunStep,
        #[source]
        source: DbError,
    },

    /// Run exceeded its deadline (H005)
    #[error("[H005] {candidate} run exceeded its {}s deadline and was rolled back", timeout.as_secs_f64())]
    RunTimeout {
        candidate: Candidate,
        timeout: Duration,
    },

    /// Analysis oracle failure (H006)
    #[error("[H006] Analysis oracle failed: {0}")]
    Oracle(String),

    /// Configuration error (H007)
    #[error("[H007] Configuration error: {0}")]
    Config(CoreError),

    /// Block transformation settings error (H008)
    #[error("[H008] {0}")]
    Sql(#[from] SqlError),

    /// Foreign keys could not be read before seeding (H009)
    #[error("[H009] Could not read foreign keys of the seeded tables: {0}")]
    ForeignKeyLookup(#[source] DbError),

    /// A parent table could not be cleared (H010).
    ///
    /// DuckDB keeps child rows deleted earlier in the same transaction visible
    /// to foreign key checks, so a parent whose committed rows are referenced
    /// cannot be emptied inside the run's transaction. Validate against tables
    /// whose referencing rows are not committed.
    #[error(
        "[H010] {candidate} run cannot clear {table}: committed rows of a referencing table \
         still hold its keys inside the run transaction: {source}"
    )]
    ClearBlocked {
        candidate: Candidate,
        table: String,
        #[source]
        source: DbError,
    },
}

/// Result type alias for HarnessError
pub type HarnessResult<T> = Result<T, HarnessError>;

impl From<CoreError> for HarnessError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SchemaParseError { message } => HarnessError::InvalidSchema { message },
            other => HarnessError::Config(other),
        }
    }
}

impl From<SeedError> for HarnessError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::InvalidSchema { message } => HarnessError::InvalidSchema { message },
        }
    }
}
