//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use pt_core::SqlDialect;

/// Proctor - validate optimized stored procedures against their originals
#[derive(Parser, Debug)]
#[command(name = "proctor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a proctor.yml config file (default: ./proctor.yml if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the original and optimized procedure on identical data and compare
    Validate(ValidateArgs),

    /// Print the synthetic seed script for a schema description
    Seed(SeedArgs),

    /// Print the executable block for a procedure definition
    Block(BlockArgs),
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// File holding the original procedure
    #[arg(short, long)]
    pub procedure: String,

    /// File holding the analysis plan (JSON, or raw oracle output containing it)
    #[arg(long)]
    pub plan: String,

    /// DuckDB database file
    #[arg(short, long, default_value = ":memory:")]
    pub database: String,

    /// SQL script committed before validation (e.g. CREATE TABLE statements)
    #[arg(long)]
    pub setup: Option<String>,

    /// Override rows generated per table
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Override the synthetic data seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override the per-run deadline in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// File holding the table schema description (JSON array)
    #[arg(long)]
    pub schema: String,

    /// Override rows generated per table
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Override the synthetic data seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// SQL dialect to render the script for
    #[arg(short, long, value_enum, default_value = "duckdb")]
    pub dialect: DialectArg,
}

/// Arguments for the block command
#[derive(Args, Debug)]
pub struct BlockArgs {
    /// File holding the procedure definition
    #[arg(short, long)]
    pub procedure: String,
}

/// Dialects accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectArg {
    /// Oracle PL/SQL anonymous block
    Oracle,
    /// DuckDB INSERT statements
    Duckdb,
}

impl From<DialectArg> for SqlDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Oracle => SqlDialect::Oracle,
            DialectArg::Duckdb => SqlDialect::DuckDb,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
