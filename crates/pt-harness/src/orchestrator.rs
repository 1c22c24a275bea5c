//! Validation orchestration
//!
//! Drives one validation request: ask the oracle for a plan, build the seed
//! script once, run the original and optimized procedures against identical
//! data, compare the results, and assemble the report.

use crate::compare::Comparator;
use crate::error::{Candidate, HarnessError, HarnessResult};
use crate::oracle::{AnalysisOracle, CompletePlan};
use crate::report::{PerformanceSummary, ValidationReport};
use crate::runner::{CandidateRunner, RunRequest, TestRunResult};
use pt_core::{TableName, ValidationConfig};
use pt_db::Database;
use pt_seed::{generate_linked_seed_script, resolve_seed, SeedScript};
use pt_sql::{check_validation_query, BlockTransformer, ExecutableBlock, QueryCheck, SqlError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stage of a validation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationState {
    AwaitingPlan,
    SeedingBuilt,
    OriginalRun,
    OptimizedRun,
    Compared,
    Done,
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationState::AwaitingPlan => "awaiting plan",
            ValidationState::SeedingBuilt => "seeding built",
            ValidationState::OriginalRun => "original run",
            ValidationState::OptimizedRun => "optimized run",
            ValidationState::Compared => "compared",
            ValidationState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a validation request, with the stage it happened in
#[derive(Debug, Error)]
#[error("Validation failed during {state}: {error}")]
pub struct ValidationFailure {
    pub state: ValidationState,
    #[source]
    pub error: HarnessError,
}

/// Runs validation requests against one database with fixed settings
pub struct Orchestrator<'a> {
    db: &'a dyn Database,
    oracle: &'a dyn AnalysisOracle,
    config: ValidationConfig,
    transformer: BlockTransformer,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator; fails on invalid settings
    pub fn new(
        db: &'a dyn Database,
        oracle: &'a dyn AnalysisOracle,
        config: ValidationConfig,
    ) -> HarnessResult<Self> {
        config.validate().map_err(HarnessError::Config)?;
        let transformer =
            BlockTransformer::with_helpers(&config.error_log_helpers, &config.status_helpers)?;
        Ok(Self {
            db,
            oracle,
            config,
            transformer,
        })
    }

    /// Settings this orchestrator was created with
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate `procedure_source` against the oracle's optimized version.
    ///
    /// A result mismatch is a failed report, not an error.
    pub async fn validate(
        &self,
        procedure_source: &str,
    ) -> Result<ValidationReport, ValidationFailure> {
        let mut state = ValidationState::AwaitingPlan;
        log::debug!("Validation state: {state}");
        let outcome = self.run(procedure_source, &mut state).await;
        outcome.map_err(|error| {
            log::warn!("Validation failed during {state}: {error}");
            ValidationFailure { state, error }
        })
    }

    async fn run(
        &self,
        procedure_source: &str,
        state: &mut ValidationState,
    ) -> HarnessResult<ValidationReport> {
        if procedure_source.trim().is_empty() {
            return Err(HarnessError::IncompletePlan {
                message: "original procedure is empty".to_string(),
            });
        }
        let plan = self.oracle.analyze(procedure_source).await?.complete()?;
        check_query(&plan.validation_query)?;

        advance(state, ValidationState::SeedingBuilt);
        let names: Vec<TableName> = plan.tables.iter().map(|t| t.name.clone()).collect();
        let foreign_keys = self
            .db
            .foreign_keys(&names)
            .await
            .map_err(HarnessError::ForeignKeyLookup)?;
        let seed = resolve_seed(self.config.seed);
        let script = generate_linked_seed_script(
            &plan.tables,
            &foreign_keys,
            self.config.row_count,
            seed,
            self.db.dialect(),
        )?;
        log::debug!(
            "Seed script covers {} tables with {} diagnostics (seed {})",
            script.tables.len(),
            script.diagnostics.len(),
            script.seed
        );

        let runner = CandidateRunner::new(self.db).with_timeout(self.config.run_timeout());

        advance(state, ValidationState::OriginalRun);
        let original_block = self.transformer.transform(procedure_source);
        let original = self
            .run_one(&runner, Candidate::Original, &original_block, &script, &plan)
            .await?;

        advance(state, ValidationState::OptimizedRun);
        let optimized_block = self.transformer.transform(&plan.optimized_body);
        let optimized = self
            .run_one(&runner, Candidate::Optimized, &optimized_block, &script, &plan)
            .await?;

        advance(state, ValidationState::Compared);
        let comparison = Comparator::new(self.config.max_rendered_mismatches)
            .compare(&original.result_set, &optimized.result_set);

        advance(state, ValidationState::Done);
        let report = ValidationReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            passed: comparison.identical,
            optimized_procedure: plan.optimized_body,
            explanation: plan.explanation,
            original_block: original_block.into_inner(),
            optimized_block: optimized_block.into_inner(),
            seed: script.seed,
            rows_per_table: script.row_count,
            seeded_tables: script.tables,
            seed_diagnostics: script.diagnostics,
            deletion_order: original.deletion_order,
            performance: PerformanceSummary::new(original.elapsed, optimized.elapsed),
            comparison,
        };
        log::info!(
            "Validation {} {}: {}",
            report.run_id,
            if report.passed { "passed" } else { "failed" },
            report.performance
        );
        Ok(report)
    }

    async fn run_one(
        &self,
        runner: &CandidateRunner<'_>,
        candidate: Candidate,
        block: &ExecutableBlock,
        script: &SeedScript,
        plan: &CompletePlan,
    ) -> HarnessResult<TestRunResult> {
        runner
            .run_candidate(RunRequest {
                candidate,
                block,
                seed: script,
                validation_query: &plan.validation_query,
            })
            .await
    }
}

fn advance(state: &mut ValidationState, next: ValidationState) {
    log::debug!("Validation state: {} -> {}", state, next);
    *state = next;
}

/// Reject validation queries that would modify data. Queries the generic
/// parser cannot read are let through with a warning.
fn check_query(sql: &str) -> HarnessResult<()> {
    match check_validation_query(sql) {
        Ok(QueryCheck::ReadOnly) => Ok(()),
        Ok(QueryCheck::Unparsed(reason)) => {
            log::warn!("Could not parse validation query, running it unchecked: {reason}");
            Ok(())
        }
        Err(SqlError::NotReadOnly(found)) => Err(HarnessError::IncompletePlan {
            message: format!("validation query must be a single read-only query, found {found}"),
        }),
        Err(e) => Err(HarnessError::IncompletePlan {
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
