use thiserror::Error;

use crate::driver::ExecuteError;

/// Errors raised while declaring or compiling a CTE-backed query.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CteBuildError {
    #[error("CTE factory for '{0}' produced an empty subquery")]
    EmptyFactoryResult(String),

    #[error("Stale statement handle {handle} (registry holds {statements} statements)")]
    StaleStatementHandle { handle: usize, statements: usize },

    #[error("Placeholder/binding mismatch: {placeholders} placeholders, {bindings} bindings")]
    BindingMismatch {
        placeholders: usize,
        bindings: usize,
    },

    #[error("Cannot inline a {0} binding as a SQL literal (only numbers and strings are inlinable)")]
    UnsupportedBindingValue(&'static str),

    #[error("Unknown entity '{0}' (register it on the entity registry first)")]
    UnknownEntity(String),

    #[error("Execution failed: {0}")]
    Execute(#[from] ExecuteError),
}
