//! Per-table row buffers filled with deterministic synthetic values

use chrono::{Days, NaiveDate};
use pt_core::{ColumnSchema, ColumnType, TableName, TableSchema};
use rand::distr::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fmt;

/// Prefix of generated string values
const STRING_PREFIX: &str = "Val_";

/// Prefix of the short string fallback
const SHORT_PREFIX: &str = "E_";

/// Headroom kept free in every string column
const LENGTH_MARGIN: i64 = 2;

/// Longest random fragment placed in a string value
const MAX_FRAGMENT_LEN: i64 = 20;

/// Upper bound of the random part of numeric values
const NUMERIC_RANGE: i64 = 100_000;

/// Generated dates cycle through this many days
const DATE_SPAN_DAYS: usize = 365 * 50;

/// A synthetic cell value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum SeedValue {
    Null,
    Text(String),
    Number(i64),
    Date(NaiveDate),
}

/// Why a column did not receive the regular value for its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Declared length too small for `Val_<fragment>_<i>`, used `E_<i>`
    ShortStringFallback,
    /// Too small even for `E_<i>`, used the empty string
    EmptyStringFallback,
    /// Too small for any string, used NULL
    NullStringFallback,
    /// Type has no generation rule, used NULL
    UnsupportedType,
    /// Referenced key column too narrow for one distinct value per row
    KeyRangeTooSmall,
    /// Foreign key column kept its own values instead of parent keys
    UnlinkedForeignKey,
}

impl DiagnosticKind {
    /// Stable code used in reports
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::ShortStringFallback => "string_short_fallback",
            DiagnosticKind::EmptyStringFallback => "string_empty_fallback",
            DiagnosticKind::NullStringFallback => "string_null_fallback",
            DiagnosticKind::UnsupportedType => "unsupported_type",
            DiagnosticKind::KeyRangeTooSmall => "key_range_too_small",
            DiagnosticKind::UnlinkedForeignKey => "unlinked_foreign_key",
        }
    }
}

/// A note about a generated column, recorded once per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedDiagnostic {
    pub kind: DiagnosticKind,
    pub table: String,
    pub column: String,
    pub message: String,
}

impl fmt::Display for SeedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}.{}: {}",
            self.kind.code(),
            self.table,
            self.column,
            self.message
        )
    }
}

/// Rows generated for one table, in column declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBuffer {
    pub table: TableName,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SeedValue>>,
}

impl TableBuffer {
    /// Number of generated rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// How values of one string column are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringRule {
    Regular { fragment_len: usize },
    Short,
    Empty,
    Null,
}

/// Per-column generation rule, resolved once before any row is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRule {
    String(StringRule),
    Numeric { modulus: Option<i64> },
    /// Numeric column referenced by a foreign key: the row index, so every
    /// row gets a distinct key
    Key { modulus: Option<i64> },
    Date,
    Null,
}

/// Number of decimal digits in `n`
pub(crate) fn digit_count(n: usize) -> i64 {
    let mut digits = 1;
    let mut rest = n / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

/// Derive a per-table seed so a table's rows do not depend on the order
/// tables are generated in.
pub(crate) fn table_seed(seed: u64, table: &TableName) -> u64 {
    let mut hash = seed ^ 0xcbf2_9ce4_8422_2325;
    for byte in table.key().as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

fn string_rule(max_length: u32, row_count: usize) -> StringRule {
    let length = i64::from(max_length);
    let digits = digit_count(row_count);
    let available = length
        - LENGTH_MARGIN
        - STRING_PREFIX.len() as i64
        - 1
        - digits;

    if available >= 1 {
        StringRule::Regular {
            fragment_len: available.min(MAX_FRAGMENT_LEN) as usize,
        }
    } else if SHORT_PREFIX.len() as i64 + digits <= length - LENGTH_MARGIN {
        StringRule::Short
    } else if length >= 2 {
        StringRule::Empty
    } else {
        StringRule::Null
    }
}

fn resolve_rule(
    table: &TableName,
    column: &ColumnSchema,
    is_key: bool,
    row_count: usize,
    diagnostics: &mut Vec<SeedDiagnostic>,
) -> ColumnRule {
    let mut note = |kind: DiagnosticKind, message: String| {
        let diagnostic = SeedDiagnostic {
            kind,
            table: table.to_string(),
            column: column.name.clone(),
            message,
        };
        log::warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
    };

    match &column.data_type {
        t if t.is_string() => {
            let length = column.max_length();
            let rule = string_rule(length, row_count);
            match rule {
                StringRule::Regular { .. } => {}
                StringRule::Short => note(
                    DiagnosticKind::ShortStringFallback,
                    format!("length {length} too small for regular values, using E_<row>"),
                ),
                StringRule::Empty => note(
                    DiagnosticKind::EmptyStringFallback,
                    format!("length {length} too small for E_<row>, using empty strings"),
                ),
                StringRule::Null => note(
                    DiagnosticKind::NullStringFallback,
                    format!("length {length} too small for any value, using NULL"),
                ),
            }
            ColumnRule::String(rule)
        }
        t if t.is_numeric() => {
            let modulus = column
                .precision
                .and_then(|p| 10_i64.checked_pow(p.integer_digits()));
            if !is_key {
                return ColumnRule::Numeric { modulus };
            }
            if let Some(m) = modulus.filter(|m| *m < row_count as i64) {
                note(
                    DiagnosticKind::KeyRangeTooSmall,
                    format!("referenced key holds {m} distinct values, {row_count} rows requested"),
                );
            }
            ColumnRule::Key { modulus }
        }
        t if t.is_date() => ColumnRule::Date,
        other => {
            let raw = match other {
                ColumnType::Unsupported(raw) if raw.is_empty() => "<missing>".to_string(),
                _ => other.to_string(),
            };
            note(
                DiagnosticKind::UnsupportedType,
                format!("no generation rule for type {raw}, using NULL"),
            );
            ColumnRule::Null
        }
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

fn generate_value(rule: ColumnRule, row: usize, rng: &mut ChaCha8Rng) -> SeedValue {
    match rule {
        ColumnRule::String(StringRule::Regular { fragment_len }) => {
            let fragment: String = (0..fragment_len)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect();
            SeedValue::Text(format!("{STRING_PREFIX}{fragment}_{row}"))
        }
        ColumnRule::String(StringRule::Short) => SeedValue::Text(format!("{SHORT_PREFIX}{row}")),
        ColumnRule::String(StringRule::Empty) => SeedValue::Text(String::new()),
        ColumnRule::String(StringRule::Null) | ColumnRule::Null => SeedValue::Null,
        ColumnRule::Numeric { modulus } => {
            let base = rng.random_range(1..=NUMERIC_RANGE) + (row as i64 % NUMERIC_RANGE);
            match modulus {
                Some(m) => SeedValue::Number(base % m),
                None => SeedValue::Number(base),
            }
        }
        ColumnRule::Key { modulus } => {
            let key = row as i64;
            match modulus {
                Some(m) => SeedValue::Number(key % m),
                None => SeedValue::Number(key),
            }
        }
        ColumnRule::Date => {
            let offset = ((row - 1) % DATE_SPAN_DAYS) as u64;
            let date = epoch()
                .checked_add_days(Days::new(offset))
                .unwrap_or_else(epoch);
            SeedValue::Date(date)
        }
    }
}

/// Fill a buffer of `row_count` rows for `table`.
///
/// Row indices are 1-based. Values depend only on `seed`, the table name,
/// and the column declarations.
pub fn generate_table(
    table: &TableSchema,
    row_count: usize,
    seed: u64,
    diagnostics: &mut Vec<SeedDiagnostic>,
) -> TableBuffer {
    generate_keyed_table(table, &[], row_count, seed, diagnostics)
}

/// Like [`generate_table`], with distinct values in `key_columns` so other
/// tables can reference them.
pub fn generate_keyed_table(
    table: &TableSchema,
    key_columns: &[&str],
    row_count: usize,
    seed: u64,
    diagnostics: &mut Vec<SeedDiagnostic>,
) -> TableBuffer {
    let rules: Vec<ColumnRule> = table
        .columns
        .iter()
        .map(|col| {
            let is_key = key_columns.iter().any(|k| k.eq_ignore_ascii_case(&col.name));
            resolve_rule(&table.name, col, is_key, row_count, diagnostics)
        })
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(table_seed(seed, &table.name));
    let rows: Vec<Vec<SeedValue>> = (1..=row_count)
        .map(|row| {
            rules
                .iter()
                .map(|rule| generate_value(*rule, row, &mut rng))
                .collect::<Vec<_>>()
        })
        .collect();

    TableBuffer {
        table: table.name.clone(),
        columns: table.columns.iter().map(|c| c.name.clone()).collect(),
        rows,
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
