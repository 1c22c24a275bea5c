//! Error types for pt-sql

use thiserror::Error;

/// SQL text handling errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// Empty SQL (Q001)
    #[error("[Q001] SQL is empty")]
    EmptySql,

    /// Validation query is not a single read-only query (Q002)
    #[error("[Q002] Validation query must be a single read-only query, found: {0}")]
    NotReadOnly(String),

    /// Invalid helper name in block transformation settings (Q003)
    #[error("[Q003] Invalid helper name '{name}': {message}")]
    InvalidHelper { name: String, message: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
