//! Result set comparison
//!
//! Checks run in a fixed order and stop early where later checks would only
//! repeat the same difference: a row or column count mismatch ends the
//! comparison, and column name or type mismatches skip the cell checks.

use pt_core::{ResultSet, Value};
use serde::Serialize;
use std::fmt;

/// Summary text when nothing differs
pub const IDENTICAL_SUMMARY: &str = "Data is identical.";

/// One difference between the expected and actual result sets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    RowCount {
        expected: usize,
        actual: usize,
    },
    ColumnCount {
        expected: usize,
        actual: usize,
    },
    ColumnName {
        index: usize,
        expected: String,
        actual: String,
    },
    ColumnType {
        index: usize,
        column: String,
        expected: String,
        actual: String,
    },
    Cell {
        row: usize,
        column: String,
        expected: Value,
        actual: Value,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::RowCount { expected, actual } => {
                write!(f, "Row count mismatch: Before={expected}, After={actual}")
            }
            Mismatch::ColumnCount { expected, actual } => {
                write!(f, "Column count mismatch: Before={expected}, After={actual}")
            }
            Mismatch::ColumnName {
                index,
                expected,
                actual,
            } => write!(
                f,
                "Column name mismatch at index {index}: Before='{expected}', After='{actual}'"
            ),
            Mismatch::ColumnType {
                column,
                expected,
                actual,
                ..
            } => write!(
                f,
                "Column type mismatch for column '{column}': Before={expected}, After={actual}"
            ),
            Mismatch::Cell {
                row,
                column,
                expected,
                actual,
            } => write!(
                f,
                "Data mismatch at Row {row}, Column '{column}': Before='{expected}', After='{actual}'"
            ),
        }
    }
}

/// Outcome of comparing two result sets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonOutcome {
    pub identical: bool,

    /// Every mismatch found, never truncated
    pub mismatches: Vec<Mismatch>,

    /// Human-readable rendering, cell mismatches possibly truncated
    pub summary: String,
}

/// Compares result sets and renders the differences.
#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    max_rendered_mismatches: usize,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            max_rendered_mismatches: pt_core::serde_helpers::default_max_rendered_mismatches(),
        }
    }
}

impl Comparator {
    /// Comparator that renders at most `max_rendered_mismatches` cell mismatches
    pub fn new(max_rendered_mismatches: usize) -> Self {
        Self {
            max_rendered_mismatches,
        }
    }

    /// Compare `expected` (original run) with `actual` (optimized run).
    pub fn compare(&self, expected: &ResultSet, actual: &ResultSet) -> ComparisonOutcome {
        let mismatches = find_mismatches(expected, actual);
        let summary = self.render(&mismatches);
        ComparisonOutcome {
            identical: mismatches.is_empty(),
            mismatches,
            summary,
        }
    }

    fn render(&self, mismatches: &[Mismatch]) -> String {
        if mismatches.is_empty() {
            return IDENTICAL_SUMMARY.to_string();
        }

        let mut lines = Vec::new();
        let mut cells_shown = 0;
        let mut cells_hidden = 0;
        for mismatch in mismatches {
            if matches!(mismatch, Mismatch::Cell { .. }) {
                if cells_shown == self.max_rendered_mismatches {
                    cells_hidden += 1;
                    continue;
                }
                cells_shown += 1;
            }
            lines.push(mismatch.to_string());
        }
        if cells_hidden > 0 {
            lines.push(format!("... and {cells_hidden} more"));
        }
        lines.join("\n")
    }
}

/// Compare with the default rendering limit.
pub fn compare_results(expected: &ResultSet, actual: &ResultSet) -> ComparisonOutcome {
    Comparator::default().compare(expected, actual)
}

fn find_mismatches(expected: &ResultSet, actual: &ResultSet) -> Vec<Mismatch> {
    if expected.row_count() != actual.row_count() {
        return vec![Mismatch::RowCount {
            expected: expected.row_count(),
            actual: actual.row_count(),
        }];
    }

    if expected.column_count() != actual.column_count() {
        return vec![Mismatch::ColumnCount {
            expected: expected.column_count(),
            actual: actual.column_count(),
        }];
    }

    let mut mismatches = Vec::new();
    for (index, (exp, act)) in expected.columns.iter().zip(&actual.columns).enumerate() {
        if exp.name != act.name {
            mismatches.push(Mismatch::ColumnName {
                index,
                expected: exp.name.clone(),
                actual: act.name.clone(),
            });
        }
        if let (Some(exp_type), Some(act_type)) = (&exp.data_type, &act.data_type) {
            if exp_type != act_type {
                mismatches.push(Mismatch::ColumnType {
                    index,
                    column: exp.name.clone(),
                    expected: exp_type.clone(),
                    actual: act_type.clone(),
                });
            }
        }
    }
    if !mismatches.is_empty() {
        return mismatches;
    }

    for (row, (exp_row, act_row)) in expected.rows.iter().zip(&actual.rows).enumerate() {
        for ((column, exp), act) in expected.columns.iter().zip(exp_row).zip(act_row) {
            if exp != act {
                mismatches.push(Mismatch::Cell {
                    row,
                    column: column.name.clone(),
                    expected: exp.clone(),
                    actual: act.clone(),
                });
            }
        }
    }
    mismatches
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;
