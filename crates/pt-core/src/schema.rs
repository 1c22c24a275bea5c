//! Table schema model
//!
//! The analysis oracle describes tables as loosely-typed JSON
//! (`tableName`, `columns[].columnName`, `columns[].dataType`). This module
//! parses that description into a strongly-typed model and drops entries that
//! cannot be used, logging each one instead of failing the whole run.

use crate::error::{CoreError, CoreResult};
use crate::table_name::TableName;
use serde::{Deserialize, Serialize};

/// Length assumed for string columns without a `(n)` suffix.
pub const DEFAULT_DECLARED_LENGTH: u32 = 30;

/// Upper bound for declared string lengths.
pub const MAX_DECLARED_LENGTH: u32 = 4000;

/// Declared column type, classified by case-insensitive prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Varchar2,
    Char,
    Number,
    Integer,
    Decimal,
    Float,
    Date,
    /// Anything else; generated as NULL.
    Unsupported(String),
}

impl ColumnType {
    /// Classify a raw type string such as `VARCHAR2(50 CHAR)` or `number`.
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        // Order matters: NVARCHAR2/VARCHAR2 before VARCHAR, INTERVAL before INT.
        if upper.starts_with("VARCHAR2")
            || upper.starts_with("NVARCHAR2")
            || upper.starts_with("VARCHAR")
        {
            ColumnType::Varchar2
        } else if upper.starts_with("CHAR") {
            ColumnType::Char
        } else if upper.starts_with("NUMBER") {
            ColumnType::Number
        } else if upper.starts_with("INTERVAL") {
            ColumnType::Unsupported(raw.trim().to_string())
        } else if upper.starts_with("INTEGER") || upper.starts_with("INT") {
            ColumnType::Integer
        } else if upper.starts_with("DECIMAL") {
            ColumnType::Decimal
        } else if upper.starts_with("FLOAT") {
            ColumnType::Float
        } else if upper.starts_with("DATE") {
            ColumnType::Date
        } else {
            ColumnType::Unsupported(raw.trim().to_string())
        }
    }

    /// Returns `true` for character types.
    pub fn is_string(&self) -> bool {
        matches!(self, ColumnType::Varchar2 | ColumnType::Char)
    }

    /// Returns `true` for numeric types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Number | ColumnType::Integer | ColumnType::Decimal | ColumnType::Float
        )
    }

    /// Returns `true` for date types.
    pub fn is_date(&self) -> bool {
        matches!(self, ColumnType::Date)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Varchar2 => write!(f, "VARCHAR2"),
            ColumnType::Char => write!(f, "CHAR"),
            ColumnType::Number => write!(f, "NUMBER"),
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::Decimal => write!(f, "DECIMAL"),
            ColumnType::Float => write!(f, "FLOAT"),
            ColumnType::Date => write!(f, "DATE"),
            ColumnType::Unsupported(raw) => write!(f, "{raw}"),
        }
    }
}

/// Numeric precision and scale from a `NUMBER(p, s)` style declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericPrecision {
    pub precision: u32,
    pub scale: u32,
}

impl NumericPrecision {
    /// Number of digits available left of the decimal point.
    pub fn integer_digits(&self) -> u32 {
        self.precision.saturating_sub(self.scale)
    }
}

/// A single typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name as given by the schema description
    pub name: String,

    /// Classified type
    pub data_type: ColumnType,

    /// Declared length from a `(n)` suffix, clamped to `[1, 4000]`
    pub declared_length: Option<u32>,

    /// Declared numeric precision, only for numeric types
    pub precision: Option<NumericPrecision>,
}

impl ColumnSchema {
    /// Parse a column from its name and raw type string.
    pub fn parse(name: impl Into<String>, raw_type: &str) -> Self {
        let data_type = ColumnType::parse(raw_type);
        let args = type_arguments(raw_type);

        let declared_length = args
            .first()
            .and_then(|first| first.parse::<i64>().ok())
            .map(|n| n.clamp(1, i64::from(MAX_DECLARED_LENGTH)) as u32);

        let precision = if data_type.is_numeric() {
            match args.as_slice() {
                [p] => p.parse::<u32>().ok().map(|precision| NumericPrecision {
                    precision,
                    scale: 0,
                }),
                [p, s, ..] => match (p.parse::<u32>(), s.parse::<u32>()) {
                    (Ok(precision), Ok(scale)) => Some(NumericPrecision { precision, scale }),
                    _ => None,
                },
                [] => None,
            }
        } else {
            None
        };

        Self {
            name: name.into(),
            data_type,
            declared_length,
            precision,
        }
    }

    /// Effective maximum length: the declared length or the default of 30.
    pub fn max_length(&self) -> u32 {
        self.declared_length.unwrap_or(DEFAULT_DECLARED_LENGTH)
    }
}

/// Extract the comma-separated arguments of a `TYPE(a, b)` declaration.
///
/// `VARCHAR2(50 CHAR)` yields `["50"]`; qualifiers after the first token of
/// each argument are ignored.
fn type_arguments(raw_type: &str) -> Vec<String> {
    let Some(open) = raw_type.find('(') else {
        return Vec::new();
    };
    let rest = &raw_type[open + 1..];
    let Some(close) = rest.find(')') else {
        return Vec::new();
    };
    rest[..close]
        .split(',')
        .filter_map(|arg| arg.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// A table with its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Schema-qualified table name
    pub name: TableName,

    /// Columns in declaration order (never empty)
    pub columns: Vec<ColumnSchema>,
}

/// Column entry as the analysis oracle describes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawColumnSchema {
    #[serde(default, alias = "column_name", alias = "name")]
    pub column_name: Option<String>,

    #[serde(default, alias = "data_type", alias = "type")]
    pub data_type: Option<String>,
}

/// Table entry as the analysis oracle describes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTableSchema {
    #[serde(default, alias = "table_name", alias = "name")]
    pub table_name: Option<String>,

    #[serde(default)]
    pub columns: Option<Vec<RawColumnSchema>>,
}

impl TableSchema {
    /// Validate a raw entry. Returns `None` (and logs why) for a table with an
    /// empty name or without any usable column.
    pub fn from_raw(raw: &RawTableSchema) -> Option<Self> {
        let Some(name) = raw.table_name.as_deref().and_then(TableName::try_new) else {
            log::warn!("Skipping table schema entry without a table name");
            return None;
        };

        let columns: Vec<ColumnSchema> = raw
            .columns
            .iter()
            .flatten()
            .filter_map(|col| {
                let col_name = col.column_name.as_deref().map(str::trim).unwrap_or("");
                if col_name.is_empty() {
                    log::warn!("Skipping unnamed column in table {}", name);
                    return None;
                }
                Some(ColumnSchema::parse(
                    col_name,
                    col.data_type.as_deref().unwrap_or(""),
                ))
            })
            .collect();

        if columns.is_empty() {
            log::warn!("Skipping table {}: no columns described", name);
            return None;
        }

        Some(Self { name, columns })
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Validate every raw entry, keeping only usable tables.
pub fn validate_tables(raw: &[RawTableSchema]) -> Vec<TableSchema> {
    raw.iter().filter_map(TableSchema::from_raw).collect()
}

/// Parse a JSON array of table descriptions and validate it.
///
/// Malformed JSON is an error; individual unusable entries are only dropped.
pub fn parse_schema_description(json: &str) -> CoreResult<Vec<TableSchema>> {
    let raw: Vec<RawTableSchema> =
        serde_json::from_str(json).map_err(|e| CoreError::SchemaParseError {
            message: e.to_string(),
        })?;
    Ok(validate_tables(&raw))
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
