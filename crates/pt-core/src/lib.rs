//! pt-core - Core library for Proctor
//!
//! This crate provides the shared types used across all Proctor components:
//! the table schema model, tabular result sets, validation configuration,
//! and foreign-key-safe deletion ordering.

pub mod config;
pub mod deletion;
pub mod error;
pub mod result_set;
pub mod schema;
pub mod serde_helpers;
pub mod sql_utils;
pub mod table_name;

pub use config::{SqlDialect, ValidationConfig};
pub use deletion::{
    compute_deletion_order, DeletionGraph, DeletionPlan, DependencyEdge, ForeignKey,
};
pub use error::{CoreError, CoreResult};
pub use result_set::{ResultColumn, ResultSet, Value};
pub use schema::{
    parse_schema_description, validate_tables, ColumnSchema, ColumnType, NumericPrecision,
    RawColumnSchema, RawTableSchema, TableSchema,
};
pub use table_name::TableName;
