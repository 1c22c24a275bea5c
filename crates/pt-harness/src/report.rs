//! Validation report

use crate::compare::ComparisonOutcome;
use pt_core::serde_helpers::duration_ms;
use pt_core::TableName;
use pt_seed::SeedDiagnostic;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Timing of both candidates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    #[serde(rename = "original_ms", serialize_with = "duration_ms")]
    pub original: Duration,

    #[serde(rename = "optimized_ms", serialize_with = "duration_ms")]
    pub optimized: Duration,

    /// Original minus optimized, negative when the optimized run is slower
    pub improvement_ms: i64,

    /// Improvement relative to the original, two decimals
    pub improvement_percent: f64,
}

impl PerformanceSummary {
    pub fn new(original: Duration, optimized: Duration) -> Self {
        let original_ms = whole_millis(original);
        let optimized_ms = whole_millis(optimized);
        let improvement_ms = original_ms - optimized_ms;
        let percent = improvement_ms as f64 * 100.0 / original_ms.max(1) as f64;
        Self {
            original,
            optimized,
            improvement_ms,
            improvement_percent: (percent * 100.0).round() / 100.0,
        }
    }

    pub fn original_ms(&self) -> i64 {
        whole_millis(self.original)
    }

    pub fn optimized_ms(&self) -> i64 {
        whole_millis(self.optimized)
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Original: {}ms, Optimized: {}ms, Improvement: {}ms ({}%)",
            self.original_ms(),
            self.optimized_ms(),
            self.improvement_ms,
            self.improvement_percent
        )
    }
}

fn whole_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Final outcome of one validation request
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Unique id of this validation
    pub run_id: String,

    /// `true` when both candidates produced identical results
    pub passed: bool,

    pub optimized_procedure: String,
    pub explanation: String,
    pub original_block: String,
    pub optimized_block: String,

    /// Seed the synthetic data was generated from; rerun with it to reproduce
    pub seed: u64,
    pub rows_per_table: usize,
    pub seeded_tables: Vec<TableName>,
    pub seed_diagnostics: Vec<SeedDiagnostic>,

    /// Children-first order the tables were cleared in before seeding
    pub deletion_order: Vec<TableName>,

    pub performance: PerformanceSummary,
    pub comparison: ComparisonOutcome,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed {
            "LOGIC TEST PASSED"
        } else {
            "LOGIC TEST FAILED"
        };
        writeln!(f, "{verdict}")?;
        writeln!(f)?;

        writeln!(f, "PERFORMANCE:")?;
        writeln!(f, "- Original:    {}ms", self.performance.original_ms())?;
        writeln!(f, "- Optimized:   {}ms", self.performance.optimized_ms())?;
        writeln!(
            f,
            "- Improvement: {}ms ({}%)",
            self.performance.improvement_ms, self.performance.improvement_percent
        )?;
        writeln!(f)?;

        writeln!(f, "TEST DATA:")?;
        writeln!(f, "- Seed:           {}", self.seed)?;
        writeln!(f, "- Rows per table: {}", self.rows_per_table)?;
        let tables: Vec<&str> = self.seeded_tables.iter().map(TableName::as_str).collect();
        writeln!(f, "- Tables:         {}", tables.join(", "))?;
        let cleared: Vec<&str> = self.deletion_order.iter().map(TableName::as_str).collect();
        writeln!(f, "- Cleared:        {}", cleared.join(", "))?;
        for diagnostic in &self.seed_diagnostics {
            writeln!(f, "- {diagnostic}")?;
        }
        writeln!(f)?;

        writeln!(f, "VALIDATION DETAILS:")?;
        write!(f, "{}", self.comparison.summary)
    }
}
