//! Compiled SQL fragments and binding alignment.
//!
//! The correctness property everything here protects: the total number of
//! positional placeholders in the final SQL equals the number of bindings,
//! and the nth placeholder (left to right) corresponds to the nth binding.

use serde::{Deserialize, Serialize};

use crate::error::CteBuildError;
use crate::value::Value;

/// Immutable result of compiling one statement or the base query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompiledFragment {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl CompiledFragment {
    pub fn new(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        CompiledFragment {
            sql: sql.into(),
            bindings,
        }
    }

    /// An empty fragment: no text, no bindings, no WITH keyword.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    /// Check the placeholder/binding invariant on this fragment.
    pub fn verify_alignment(&self) -> Result<(), CteBuildError> {
        let placeholders = self.placeholder_count();
        if placeholders == self.bindings.len() {
            Ok(())
        } else {
            Err(CteBuildError::BindingMismatch {
                placeholders,
                bindings: self.bindings.len(),
            })
        }
    }
}

/// Merge a WITH preamble ahead of the base SELECT.
///
/// WITH bindings come first: the preamble textually precedes the base
/// statement and placeholders resolve left to right across the whole
/// statement. An empty preamble returns the base untouched.
pub fn merge_with_base(with: CompiledFragment, base: CompiledFragment) -> CompiledFragment {
    if with.is_empty() {
        return base;
    }
    let mut bindings = with.bindings;
    bindings.extend(base.bindings);
    CompiledFragment {
        sql: format!("{} {}", with.sql, base.sql),
        bindings,
    }
}

/// Count positional `?` placeholders, ignoring any inside single-quoted
/// literals (doubled-quote escapes included).
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut in_string = false;
    for ch in sql.chars() {
        match ch {
            '\'' => in_string = !in_string,
            '?' if !in_string => count += 1,
            _ => {}
        }
    }
    count
}
