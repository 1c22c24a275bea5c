//! pt-harness - Validation harness for Proctor
//!
//! Runs an original stored procedure and its proposed optimization against
//! identical synthetic data inside rolled-back transactions, compares what
//! the validation query returns, and reports correctness and timing.

pub mod compare;
pub mod error;
pub mod oracle;
pub mod orchestrator;
pub mod report;
pub mod runner;

pub use compare::{compare_results, Comparator, ComparisonOutcome, Mismatch, IDENTICAL_SUMMARY};
pub use error::{Candidate, HarnessError, HarnessResult, RunStep};
pub use oracle::{AnalysisOracle, AnalysisPlan, CompletePlan, FileOracle, StaticOracle};
pub use orchestrator::{Orchestrator, ValidationFailure, ValidationState};
pub use report::{PerformanceSummary, ValidationReport};
pub use runner::{CandidateRunner, RunRequest, TestRunResult};
