//! Shared serde helper functions used across multiple modules.

use serde::Serializer;
use std::time::Duration;

/// Default number of synthetic rows per table.
pub fn default_row_count() -> usize {
    10
}

/// Default number of cell mismatches rendered in a comparison summary.
pub fn default_max_rendered_mismatches() -> usize {
    50
}

/// Serialize a [`Duration`] as whole milliseconds.
pub fn duration_ms<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
