//! Execution collaborator seam.
//!
//! The compiler hands a finished `(sql, bindings)` pair to whatever driver
//! the caller plugs in; result materialization stays out of this crate.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::fragment::CompiledFragment;
use crate::value::Value;

/// One result row, keyed by column name.
pub type Row = BTreeMap<String, Value>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecuteError {
    #[error("driver error: {0}")]
    Driver(String),
}

/// Runs a compiled statement against a concrete database.
///
/// Implementations receive the full SQL text and the ordered binding list;
/// the nth placeholder in the text corresponds to the nth binding.
pub trait QueryExecutor {
    fn execute(&self, fragment: &CompiledFragment) -> Result<Vec<Row>, ExecuteError>;
}
