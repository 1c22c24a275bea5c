//! pt-seed - Synthetic seed data for Proctor
//!
//! Builds a deterministic seed script for a set of table schemas. Values are
//! derived from a single seed and written into the script as literals, so
//! running the script twice yields identical rows.

pub mod error;
pub mod generator;
mod links;
pub mod script;

pub use error::{SeedError, SeedResult};
pub use generator::{
    generate_keyed_table, generate_table, DiagnosticKind, SeedDiagnostic, SeedValue, TableBuffer,
};
pub use script::{generate_linked_seed_script, generate_seed_script, resolve_seed, SeedScript};
