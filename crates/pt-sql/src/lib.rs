//! pt-sql - SQL text handling for Proctor
//!
//! Rewrites procedure definitions into anonymous blocks that can be executed
//! inside a transaction, and checks that validation queries are read-only.

pub mod block;
pub mod error;
pub mod query;

pub use block::{to_executable_block, BlockTransformer, ExecutableBlock, HelperKind};
pub use error::{SqlError, SqlResult};
pub use query::{check_validation_query, QueryCheck};
