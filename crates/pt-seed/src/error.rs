//! Error types for pt-seed

use thiserror::Error;

/// Seed generation errors
#[derive(Error, Debug)]
pub enum SeedError {
    /// Nothing usable to seed (S001)
    #[error("[S001] Invalid schema: {message}")]
    InvalidSchema { message: String },
}

/// Result type alias for SeedError
pub type SeedResult<T> = Result<T, SeedError>;
