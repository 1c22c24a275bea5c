//! Error types for pt-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Transaction already rolled back (D004)
    #[error("[D004] Transaction is closed, cannot run: {0}")]
    TransactionClosed(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Blocking database task failed to complete (D006)
    #[error("[D006] Internal database error: {0}")]
    Internal(String),

    /// Statement rejected by a foreign key constraint (D007)
    #[error("[D007] Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error carries no structured catalog variants, so classify by message.
        let msg = err.to_string();
        if is_foreign_key_violation(&msg) {
            DbError::ForeignKeyViolation(msg)
        } else if msg.contains("Table with name")
            || msg.contains("View with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

/// DuckDB reports every foreign key failure as a constraint error that
/// mentions the foreign key.
pub(crate) fn is_foreign_key_violation(msg: &str) -> bool {
    msg.contains("Constraint Error") && msg.to_lowercase().contains("foreign key")
}
