//! Validation query checks

use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Outcome of checking a validation query before it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCheck {
    /// Parsed as exactly one query statement
    ReadOnly,
    /// Could not be parsed; carries the parser message.
    ///
    /// Vendor syntax the generic parser does not know ends up here, so the
    /// caller decides whether to proceed.
    Unparsed(String),
}

/// Check that `sql` is a single read-only query.
///
/// Statements that parse but modify data (or more than one statement) are
/// rejected outright.
pub fn check_validation_query(sql: &str) -> SqlResult<QueryCheck> {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return Err(SqlError::EmptySql);
    }

    let statements = match Parser::parse_sql(&GenericDialect {}, trimmed) {
        Ok(statements) => statements,
        Err(e) => return Ok(QueryCheck::Unparsed(e.to_string())),
    };

    match statements.as_slice() {
        [] => Err(SqlError::EmptySql),
        [Statement::Query(_)] => Ok(QueryCheck::ReadOnly),
        [other] => Err(SqlError::NotReadOnly(statement_keyword(other))),
        many => Err(SqlError::NotReadOnly(format!("{} statements", many.len()))),
    }
}

/// Leading keyword of a statement, for error messages
fn statement_keyword(statement: &Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .next()
        .unwrap_or("statement")
        .to_uppercase()
}
