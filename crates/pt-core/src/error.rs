//! Error types for pt-core

use thiserror::Error;

/// Core error type for Proctor
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Foreign key graph cannot be ordered
    #[error("[E004] Cyclic dependency detected among tables, cannot determine deletion order: {}", tables.join(", "))]
    CyclicDependency { tables: Vec<String> },

    /// E005: Table schema description could not be parsed
    #[error("[E005] Invalid table schema description: {message}")]
    SchemaParseError { message: String },

    /// E006: IO error with file path context
    #[error("[E006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
