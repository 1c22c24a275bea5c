//! Database and transaction traits

use crate::error::DbResult;
use async_trait::async_trait;
use pt_core::{DependencyEdge, ForeignKey, ResultSet, SqlDialect, TableName};

/// A database the harness can open isolated transactions against.
///
/// Implementations must be Send + Sync so one handle can be shared by the
/// orchestrator and its runs.
#[async_trait]
pub trait Database: Send + Sync {
    /// Open a new transaction.
    ///
    /// Nothing done through the returned handle is visible to other sessions
    /// unless the implementation commits, which the harness never asks for.
    async fn begin_transaction(&self) -> DbResult<Box<dyn Transaction>>;

    /// Execute one or more statements outside any harness transaction
    async fn execute_write(&self, sql: &str) -> DbResult<()>;

    /// Run a read query outside any harness transaction
    async fn execute_read(&self, sql: &str) -> DbResult<ResultSet>;

    /// Column-level foreign keys among `tables`, read from the catalog.
    ///
    /// Backends without a readable catalog report none.
    async fn foreign_keys(&self, _tables: &[TableName]) -> DbResult<Vec<ForeignKey>> {
        Ok(Vec::new())
    }

    /// Dialect generated scripts must be rendered in
    fn dialect(&self) -> SqlDialect;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// One open transaction.
///
/// Dropping a transaction that is still open rolls it back.
#[async_trait]
pub trait Transaction: Send {
    /// Execute one or more statements (DML or an anonymous block)
    async fn execute_write(&mut self, sql: &str) -> DbResult<()>;

    /// Run a read query and collect every row
    async fn execute_read(&mut self, sql: &str) -> DbResult<ResultSet>;

    /// Foreign keys among `tables`, as seen by this transaction.
    ///
    /// Edges with an endpoint outside `tables` are omitted. Edge endpoints use
    /// the spelling given in `tables`.
    async fn foreign_keys(&mut self, tables: &[TableName]) -> DbResult<Vec<DependencyEdge>>;

    /// Discard every change made in this transaction and close it
    async fn rollback(&mut self) -> DbResult<()>;

    /// Ask the backend to abort the statement currently running in this
    /// transaction. The transaction stays open until rolled back.
    fn interrupt(&self) {}

    /// Returns `true` until the transaction has been rolled back
    fn is_open(&self) -> bool;
}
