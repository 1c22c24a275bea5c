//! Procedure-to-block transformation
//!
//! Turns a named procedure definition into an anonymous block that can run
//! without being installed. This is a best-effort text rewrite, not a parser:
//! overloaded procedures, packages, and quoted identifiers that contain
//! keyword-like text are not handled. Input that does not look like a
//! procedure is passed through, so problems surface when the block executes.

use crate::error::{SqlError, SqlResult};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

/// Leading `[CREATE [OR REPLACE] [EDITIONABLE]] PROCEDURE name [(params)] IS|AS`.
fn header_pattern() -> &'static Regex {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    HEADER_RE.get_or_init(|| {
        Regex::new(
            r#"(?is)\A\s*(?:CREATE\s+(?:OR\s+REPLACE\s+)?(?:(?:NON)?EDITIONABLE\s+)?)?PROCEDURE\s+[A-Za-z0-9_$#".]+(?:\s*\(.*?\))?\s+(?:IS|AS)\s+"#,
        )
        .expect("valid regex literal")
    })
}

/// `END [name];`, the last occurrence closes the procedure body.
fn terminator_pattern() -> &'static Regex {
    static END_RE: OnceLock<Regex> = OnceLock::new();
    END_RE.get_or_init(|| {
        Regex::new(r#"(?i)\bEND\b\s*(?:[A-Za-z0-9_$#".]+)?\s*;"#).expect("valid regex literal")
    })
}

/// Trailing SQL*Plus `/` run marker.
fn run_marker_pattern() -> &'static Regex {
    static RUN_RE: OnceLock<Regex> = OnceLock::new();
    RUN_RE.get_or_init(|| Regex::new(r"\n\s*/\s*\z").expect("valid regex literal"))
}

/// An anonymous block ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableBlock(String);

impl ExecutableBlock {
    /// Wrap SQL text that is already executable as-is
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// Return the block text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the block text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ExecutableBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a matched helper call is replaced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperKind {
    /// Error-logging helper, becomes `RAISE;`
    ErrorLog,
    /// Status or print helper, becomes `NULL;`
    Status,
}

impl HelperKind {
    fn replacement(self) -> &'static str {
        match self {
            HelperKind::ErrorLog => "RAISE;",
            HelperKind::Status => "NULL;",
        }
    }
}

#[derive(Debug, Clone)]
struct HelperRule {
    name: String,
    kind: HelperKind,
    pattern: Regex,
}

/// Rewrites procedure definitions into executable blocks.
#[derive(Debug, Clone, Default)]
pub struct BlockTransformer {
    helpers: Vec<HelperRule>,
}

impl BlockTransformer {
    /// Transformer without helper replacement
    pub fn new() -> Self {
        Self::default()
    }

    /// Transformer that also replaces calls to the given helpers.
    ///
    /// Names are matched case-insensitively and may be package-qualified
    /// (`PKG_LOG.LOG_ERROR`).
    pub fn with_helpers(error_helpers: &[String], status_helpers: &[String]) -> SqlResult<Self> {
        let error_rules = error_helpers
            .iter()
            .map(|name| helper_rule(name, HelperKind::ErrorLog));
        let status_rules = status_helpers
            .iter()
            .map(|name| helper_rule(name, HelperKind::Status));
        let helpers = error_rules.chain(status_rules).collect::<SqlResult<Vec<_>>>()?;
        Ok(Self { helpers })
    }

    /// Convert `source` into an anonymous block.
    ///
    /// Only the leading header and the last `END [name];` are rewritten;
    /// nested blocks are left alone. Missing matches are not an error.
    pub fn transform(&self, source: &str) -> ExecutableBlock {
        let mut block = source.trim().to_string();

        match header_pattern().find(&block) {
            Some(m) => block.replace_range(m.range(), "DECLARE\n"),
            None => log::debug!("No procedure header found, leaving block opener unchanged"),
        }

        if let Some(m) = run_marker_pattern().find(&block) {
            block.truncate(m.start());
        }

        match terminator_pattern().find_iter(&block).last() {
            Some(m) => block.replace_range(m.range(), "END;"),
            None => log::debug!("No END terminator found, leaving block end unchanged"),
        }

        for helper in &self.helpers {
            let replaced = helper
                .pattern
                .replace_all(&block, |caps: &Captures<'_>| match caps.get(0) {
                    Some(call) if !is_member_access(&block, call.start()) => {
                        helper.kind.replacement().to_string()
                    }
                    Some(call) => call.as_str().to_string(),
                    None => String::new(),
                });
            if let std::borrow::Cow::Owned(updated) = replaced {
                if updated != block {
                    log::debug!("Replaced calls to helper {}", helper.name);
                }
                block = updated;
            }
        }

        ExecutableBlock(block)
    }
}

/// Whether the name at `start` continues a qualified or `$`/`#` identifier,
/// as in `DBMS_OUTPUT.PUT_LINE` or `V$LOG`.
fn is_member_access(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| matches!(c, '.' | '$' | '#'))
}

fn helper_rule(name: &str, kind: HelperKind) -> SqlResult<HelperRule> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(SqlError::InvalidHelper {
            name: name.to_string(),
            message: "helper names must be non-empty and contain no whitespace".to_string(),
        });
    }

    // Arguments may contain string literals and one level of nested parentheses.
    let pattern = format!(
        r"(?i)\b{}\s*(?:\((?:[^()']|'(?:[^']|'')*'|\((?:[^()']|'(?:[^']|'')*')*\))*\))?\s*;",
        regex::escape(trimmed)
    );
    let pattern = Regex::new(&pattern).map_err(|e| SqlError::InvalidHelper {
        name: name.to_string(),
        message: e.to_string(),
    })?;

    Ok(HelperRule {
        name: trimmed.to_string(),
        kind,
        pattern,
    })
}

/// Convert a procedure definition into an executable block without helper
/// replacement.
pub fn to_executable_block(source: &str) -> ExecutableBlock {
    BlockTransformer::new().transform(source)
}

#[cfg(test)]
#[path = "block_test.rs"]
mod tests;
