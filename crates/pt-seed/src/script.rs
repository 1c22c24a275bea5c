//! Seed script assembly and dialect rendering

use crate::error::{SeedError, SeedResult};
use crate::generator::{generate_keyed_table, SeedDiagnostic, SeedValue, TableBuffer};
use crate::links::{insertion_order, key_columns, link_rows};
use pt_core::sql_utils::{quote_ident, quote_literal};
use pt_core::{ForeignKey, SqlDialect, TableName, TableSchema};
use rand::Rng;
use std::fmt::Write;

/// A rendered seed script plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedScript {
    /// Executable SQL for the target dialect
    pub sql: String,

    /// Seeded tables in insertion order (parents first), names as given
    pub tables: Vec<TableName>,

    /// Seed the values were derived from
    pub seed: u64,

    /// Rows generated per table
    pub row_count: usize,

    /// Column-level notes about fallback values
    pub diagnostics: Vec<SeedDiagnostic>,
}

/// Use the configured seed or draw a fresh one.
pub fn resolve_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(|| rand::rng().random())
}

/// Generate `row_count` rows for every table and render them for `dialect`.
///
/// Tables without columns are skipped. Fails when nothing is left to seed or
/// `row_count` is zero. Pure: no I/O.
pub fn generate_seed_script(
    tables: &[TableSchema],
    row_count: usize,
    seed: u64,
    dialect: SqlDialect,
) -> SeedResult<SeedScript> {
    generate_linked_seed_script(tables, &[], row_count, seed, dialect)
}

/// [`generate_seed_script`] for tables joined by `foreign_keys`.
///
/// Parents are inserted first, referenced columns get distinct values, and
/// foreign key columns take values from the parent rows. Keys that cannot be
/// honoured are reported as diagnostics.
pub fn generate_linked_seed_script(
    tables: &[TableSchema],
    foreign_keys: &[ForeignKey],
    row_count: usize,
    seed: u64,
    dialect: SqlDialect,
) -> SeedResult<SeedScript> {
    if row_count == 0 {
        return Err(SeedError::InvalidSchema {
            message: "row count must be greater than zero".to_string(),
        });
    }

    let usable: Vec<&TableSchema> = tables
        .iter()
        .filter(|t| {
            if t.columns.is_empty() {
                log::warn!("Skipping table {} without columns", t.name);
                false
            } else {
                true
            }
        })
        .collect();

    if usable.is_empty() {
        return Err(SeedError::InvalidSchema {
            message: "no valid tables to seed".to_string(),
        });
    }

    let mut diagnostics = Vec::new();
    let mut buffers: Vec<TableBuffer> = insertion_order(&usable, foreign_keys)
        .into_iter()
        .map(|idx| {
            let table = usable[idx];
            let keys = key_columns(&table.name, foreign_keys);
            generate_keyed_table(table, &keys, row_count, seed, &mut diagnostics)
        })
        .collect();
    link_rows(&mut buffers, foreign_keys, seed, &mut diagnostics);

    let sql = match dialect {
        SqlDialect::Oracle => render_oracle(&buffers),
        SqlDialect::DuckDb => render_duckdb(&buffers),
    };

    log::debug!(
        "Generated {} seed rows for {} tables (seed {}, {})",
        row_count,
        buffers.len(),
        seed,
        dialect
    );

    Ok(SeedScript {
        sql,
        tables: buffers.into_iter().map(|b| b.table).collect(),
        seed,
        row_count,
        diagnostics,
    })
}

/// Render a value as a SQL literal.
fn literal(value: &SeedValue) -> String {
    match value {
        SeedValue::Null => "NULL".to_string(),
        SeedValue::Text(s) => quote_literal(s),
        SeedValue::Number(n) => n.to_string(),
        SeedValue::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
    }
}

/// One anonymous PL/SQL block: an associative array per table, filled field by
/// field, then flushed with a single bulk insert.
fn render_oracle(buffers: &[TableBuffer]) -> String {
    let mut sql = String::from("DECLARE\n");
    for (idx, buffer) in buffers.iter().enumerate() {
        let n = idx + 1;
        let _ = writeln!(
            sql,
            "  TYPE t_seed_{n} IS TABLE OF {}%ROWTYPE INDEX BY PLS_INTEGER;",
            buffer.table
        );
        let _ = writeln!(sql, "  v_seed_{n} t_seed_{n};");
    }

    sql.push_str("BEGIN\n");
    for (idx, buffer) in buffers.iter().enumerate() {
        let n = idx + 1;
        for (row_idx, row) in buffer.rows.iter().enumerate() {
            for (column, value) in buffer.columns.iter().zip(row) {
                let _ = writeln!(
                    sql,
                    "  v_seed_{n}({}).{} := {};",
                    row_idx + 1,
                    quote_ident(column),
                    literal(value)
                );
            }
        }
        let _ = writeln!(sql, "  FORALL i IN 1 .. v_seed_{n}.COUNT");
        let _ = writeln!(sql, "    INSERT INTO {} VALUES v_seed_{n}(i);", buffer.table);
    }
    sql.push_str("END;");
    sql
}

/// One multi-row INSERT per table.
fn render_duckdb(buffers: &[TableBuffer]) -> String {
    let mut sql = String::new();
    for buffer in buffers {
        let columns: Vec<String> = buffer.columns.iter().map(|c| quote_ident(c)).collect();
        let _ = writeln!(
            sql,
            "INSERT INTO {} ({}) VALUES",
            buffer.table,
            columns.join(", ")
        );
        let rows: Vec<String> = buffer
            .rows
            .iter()
            .map(|row| {
                let values: Vec<String> = row.iter().map(literal).collect();
                format!("  ({})", values.join(", "))
            })
            .collect();
        let _ = writeln!(sql, "{};", rows.join(",\n"));
    }
    sql
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
