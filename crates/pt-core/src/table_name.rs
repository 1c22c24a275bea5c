//! Strongly-typed table name wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Strongly-typed wrapper for table names (usually schema-qualified like "SALES.ORDERS").
///
/// The caller's spelling is preserved for rendering; [`TableName::key`] gives
/// the case-folded form used whenever two names are matched against each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    /// Create a new `TableName`, panicking in debug builds if the name is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        debug_assert!(!s.trim().is_empty(), "TableName must not be empty");
        Self(s)
    }

    /// Try to create a new `TableName`, returning `None` if the name is blank.
    ///
    /// Surrounding whitespace is trimmed.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Case-folded lookup key with identifier quotes removed.
    pub fn key(&self) -> String {
        self.0.replace('"', "").to_uppercase()
    }

    /// Split into `(schema, table)`; the schema is `None` for unqualified names.
    pub fn parts(&self) -> (Option<&str>, &str) {
        match self.0.rfind('.') {
            Some(pos) => (Some(&self.0[..pos]), &self.0[pos + 1..]),
            None => (None, &self.0),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for TableName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TableName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TableName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TableName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for TableName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TableName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
