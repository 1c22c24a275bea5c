//! pt-db - Database abstraction layer for Proctor
//!
//! This crate provides the transactional `Database` and `Transaction`
//! traits the harness runs against, and a DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod foreign_keys;
pub mod traits;

pub use duckdb::{DuckDbBackend, DuckDbTransaction};
pub use error::{DbError, DbResult};
pub use foreign_keys::{edges_within, ForeignKeyRef};
pub use traits::{Database, Transaction};
