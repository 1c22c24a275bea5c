//! CLI command implementations

pub(crate) mod block;
pub(crate) mod common;
pub(crate) mod seed;
pub(crate) mod validate;
