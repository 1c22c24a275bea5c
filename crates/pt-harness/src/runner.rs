//! Transactional candidate runs

use crate::error::{Candidate, HarnessError, HarnessResult, RunStep};
use pt_core::{compute_deletion_order, CoreError, DeletionPlan, DependencyEdge, ResultSet, TableName};
use pt_db::{Database, DbError, Transaction};
use pt_seed::SeedScript;
use pt_sql::ExecutableBlock;
use std::time::{Duration, Instant};

/// Result of one candidate run
#[derive(Debug, Clone)]
pub struct TestRunResult {
    /// Candidate that was executed
    pub candidate: Candidate,

    /// Rows returned by the validation query
    pub result_set: ResultSet,

    /// Execution time of the candidate block alone
    pub elapsed: Duration,

    /// Order the seeded tables were cleared in
    pub deletion_order: Vec<TableName>,
}

/// What a single run executes
#[derive(Debug, Clone, Copy)]
pub struct RunRequest<'a> {
    pub candidate: Candidate,
    pub block: &'a ExecutableBlock,
    pub seed: &'a SeedScript,
    pub validation_query: &'a str,
}

/// Runs candidates inside transactions that are always rolled back
pub struct CandidateRunner<'a> {
    db: &'a dyn Database,
    run_timeout: Option<Duration>,
}

impl<'a> CandidateRunner<'a> {
    /// Create a new runner without a deadline
    pub fn new(db: &'a dyn Database) -> Self {
        Self {
            db,
            run_timeout: None,
        }
    }

    /// Abandon a run (and roll it back) once it takes longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Clear, seed, execute, and validate one candidate in a fresh transaction.
    ///
    /// The transaction is rolled back whatever the outcome. A step failure is
    /// returned after the rollback attempt; a rollback failure is only
    /// reported when every step succeeded.
    pub async fn run_candidate(&self, request: RunRequest<'_>) -> HarnessResult<TestRunResult> {
        let candidate = request.candidate;
        let mut tx = self
            .db
            .begin_transaction()
            .await
            .map_err(step_error(candidate, RunStep::Begin))?;

        let outcome = match self.run_timeout {
            Some(limit) => {
                let finished = tokio::time::timeout(limit, run_steps(tx.as_mut(), request)).await;
                match finished {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        log::warn!("{candidate} run exceeded {limit:?}, rolling back");
                        tx.interrupt();
                        Err(HarnessError::RunTimeout {
                            candidate,
                            timeout: limit,
                        })
                    }
                }
            }
            None => run_steps(tx.as_mut(), request).await,
        };

        let rollback = tx.rollback().await;
        match (outcome, rollback) {
            (Ok(result), Ok(())) => Ok(result),
            (Ok(_), Err(source)) => Err(HarnessError::Execution {
                candidate,
                step: RunStep::Rollback,
                source,
            }),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(rollback_err)) => {
                log::warn!("Rollback after failed {candidate} run also failed: {rollback_err}");
                Err(e)
            }
        }
    }
}

fn step_error(candidate: Candidate, step: RunStep) -> impl Fn(DbError) -> HarnessError {
    move |source| HarnessError::Execution {
        candidate,
        step,
        source,
    }
}

fn clearing_order(
    candidate: Candidate,
    tables: &[TableName],
    edges: &[DependencyEdge],
) -> HarnessResult<DeletionPlan> {
    compute_deletion_order(tables, edges).map_err(|err| match err {
        CoreError::CyclicDependency { tables } => {
            HarnessError::CyclicDependency { candidate, tables }
        }
        other => HarnessError::from(other),
    })
}

fn clear_error(candidate: Candidate, table: &TableName) -> impl Fn(DbError) -> HarnessError + '_ {
    move |source| match source {
        DbError::ForeignKeyViolation(_) => HarnessError::ClearBlocked {
            candidate,
            table: table.to_string(),
            source,
        },
        source => step_error(candidate, RunStep::Clear)(source),
    }
}

async fn run_steps(
    tx: &mut dyn Transaction,
    request: RunRequest<'_>,
) -> HarnessResult<TestRunResult> {
    let RunRequest {
        candidate,
        block,
        seed,
        validation_query,
    } = request;
    let tables = &seed.tables;

    let start = Instant::now();
    let edges = tx
        .foreign_keys(tables)
        .await
        .map_err(step_error(candidate, RunStep::Clear))?;
    let plan = clearing_order(candidate, tables, &edges)?;
    for table in plan.tables() {
        tx.execute_write(&format!("DELETE FROM {table}"))
            .await
            .map_err(clear_error(candidate, table))?;
    }
    log::debug!(
        "{candidate}: cleared {} tables in {:?}",
        plan.len(),
        start.elapsed()
    );

    let start = Instant::now();
    tx.execute_write(&seed.sql)
        .await
        .map_err(step_error(candidate, RunStep::Seed))?;
    log::debug!("{candidate}: seeded in {:?}", start.elapsed());

    let start = Instant::now();
    tx.execute_write(block.as_str())
        .await
        .map_err(step_error(candidate, RunStep::Execute))?;
    let elapsed = start.elapsed();
    log::debug!("{candidate}: executed in {elapsed:?}");

    let result_set = tx
        .execute_read(validation_query)
        .await
        .map_err(step_error(candidate, RunStep::Validate))?;
    log::debug!(
        "{candidate}: validation query returned {} rows",
        result_set.row_count()
    );

    Ok(TestRunResult {
        candidate,
        result_set,
        elapsed,
        deletion_order: plan.into_inner(),
    })
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
