//! Analysis oracle interface
//!
//! The oracle looks at the original procedure and proposes an optimized
//! version, the tables it touches, and a query that captures its effect.
//! How it does that (a model, a human, a file) is outside this crate.

use crate::error::{HarnessError, HarnessResult};
use async_trait::async_trait;
use pt_core::{validate_tables, RawTableSchema, TableSchema};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Produces an analysis plan for a procedure
#[async_trait]
pub trait AnalysisOracle: Send + Sync {
    /// Analyze `procedure_source` and return the plan to validate
    async fn analyze(&self, procedure_source: &str) -> HarnessResult<AnalysisPlan>;
}

/// Plan as returned by an oracle. Every field may be missing; see
/// [`AnalysisPlan::complete`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPlan {
    #[serde(default, alias = "optimized_procedure_body")]
    pub optimized_procedure_body: Option<String>,

    #[serde(default)]
    pub explanation: Option<String>,

    /// Accepted either as a JSON array or as a string holding one
    #[serde(
        default,
        alias = "table_schema_description",
        deserialize_with = "deserialize_schema_description"
    )]
    pub table_schema_description: Option<Vec<RawTableSchema>>,

    #[serde(
        default,
        alias = "validation_query",
        alias = "validation_query_after",
        alias = "validationQueryAfter"
    )]
    pub validation_query: Option<String>,
}

/// A plan with every required part present
#[derive(Debug, Clone)]
pub struct CompletePlan {
    pub optimized_body: String,
    pub explanation: String,
    pub tables: Vec<TableSchema>,
    pub validation_query: String,
}

impl AnalysisPlan {
    /// Extract and parse a plan from raw oracle output.
    ///
    /// The JSON object is taken from a ```` ```json ```` fence when present,
    /// otherwise from the first `{` to the last `}`.
    pub fn from_response_text(text: &str) -> HarnessResult<Self> {
        let block = extract_json_block(text).ok_or_else(|| {
            HarnessError::Oracle("response does not contain a JSON object".to_string())
        })?;
        serde_json::from_str(block).map_err(|e| {
            HarnessError::Oracle(format!("failed to parse analysis plan: {e}: {block}"))
        })
    }

    /// Check that the optimized body, validation query, and schema are present.
    ///
    /// Blank strings count as missing. Unusable schema entries are dropped
    /// here (and logged); an empty remainder is left for seeding to reject.
    pub fn complete(self) -> HarnessResult<CompletePlan> {
        let optimized_body = non_blank(self.optimized_procedure_body)
            .ok_or_else(|| incomplete("optimized procedure body is missing"))?;
        let validation_query = non_blank(self.validation_query)
            .ok_or_else(|| incomplete("validation query is missing"))?;
        let raw_tables = self
            .table_schema_description
            .ok_or_else(|| incomplete("table schema description is missing"))?;

        Ok(CompletePlan {
            optimized_body,
            explanation: self.explanation.unwrap_or_default(),
            tables: validate_tables(&raw_tables),
            validation_query,
        })
    }
}

fn incomplete(message: &str) -> HarnessError {
    HarnessError::IncompletePlan {
        message: message.to_string(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find(JSON_FENCE) {
        let body_start = start + JSON_FENCE.len();
        if let Some(end) = text.rfind(FENCE).filter(|&end| end > body_start) {
            return Some(text[body_start..end].trim());
        }
    }

    let first = text.find('{')?;
    let last = text.rfind('}')?;
    (last > first).then(|| &text[first..=last])
}

fn deserialize_schema_description<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<RawTableSchema>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(inner)) => serde_json::from_str(&inner)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid tableSchemaDescription: {e}"))),
        Some(other) => serde_json::from_value(other)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid tableSchemaDescription: {e}"))),
    }
}

/// Oracle that returns a plan stored in a file.
///
/// The file may hold raw oracle output; see [`AnalysisPlan::from_response_text`].
#[derive(Debug, Clone)]
pub struct FileOracle {
    path: PathBuf,
}

impl FileOracle {
    /// Create an oracle reading from `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl AnalysisOracle for FileOracle {
    async fn analyze(&self, _procedure_source: &str) -> HarnessResult<AnalysisPlan> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            HarnessError::Oracle(format!("failed to read {}: {e}", self.path.display()))
        })?;
        log::debug!("Loaded analysis plan from {}", self.path.display());
        AnalysisPlan::from_response_text(&text)
    }
}

/// Oracle that always returns the same plan
#[derive(Debug, Clone)]
pub struct StaticOracle {
    plan: AnalysisPlan,
}

impl StaticOracle {
    /// Create an oracle returning `plan`
    pub fn new(plan: AnalysisPlan) -> Self {
        Self { plan }
    }
}

#[async_trait]
impl AnalysisOracle for StaticOracle {
    async fn analyze(&self, _procedure_source: &str) -> HarnessResult<AnalysisPlan> {
        Ok(self.plan.clone())
    }
}

#[cfg(test)]
#[path = "oracle_test.rs"]
mod tests;
