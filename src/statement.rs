//! The ordered statement registry behind a query context.
//!
//! Each statement pairs a WITH-clause alias with a factory that produces a
//! fresh, unconstrained subquery, plus the predicates deferred onto that
//! declaration. The list is append-only and consumed read-only at compile
//! time.

use std::fmt;
use std::sync::Arc;

use crate::error::CteBuildError;
use crate::predicate::Predicate;
use crate::query_ast::SelectQuery;

/// Produces a fresh subquery skeleton on every call. Factories must be
/// pure: per-call-site variation lives in the predicate list, never here.
pub type QueryFactory = Arc<dyn Fn() -> SelectQuery + Send + Sync>;

/// One CTE declaration.
#[derive(Clone)]
pub struct Statement {
    alias: String,
    factory: QueryFactory,
    predicates: Vec<Predicate>,
}

impl Statement {
    pub fn new(alias: impl Into<String>, factory: QueryFactory) -> Self {
        Statement {
            alias: alias.into(),
            factory,
            predicates: Vec::new(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub(crate) fn push_predicate(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Instantiate an unconstrained subquery from the factory.
    pub fn fresh_query(&self) -> SelectQuery {
        (self.factory)()
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("alias", &self.alias)
            .field("predicates", &self.predicates)
            .finish_non_exhaustive()
    }
}

/// Opaque handle to one declaration, used to attach deferred predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementHandle(pub(crate) usize);

/// Append-only, ordered list of CTE declarations.
///
/// Cloning deep-copies every predicate list (factories are shared, they
/// are pure), so post-clone mutation of one context never leaks into
/// another.
#[derive(Debug, Clone, Default)]
pub struct StatementRegistry {
    statements: Vec<Statement>,
}

impl StatementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration and return its handle.
    ///
    /// Duplicate aliases are permitted and kept: compiling such a registry
    /// emits one WITH entry per declaration, in insertion order. Callers
    /// are responsible for avoiding redundant declarations.
    pub fn declare(&mut self, alias: impl Into<String>, factory: QueryFactory) -> StatementHandle {
        let handle = StatementHandle(self.statements.len());
        let statement = Statement::new(alias, factory);
        log::debug!(
            "declared CTE statement '{}' at position {}",
            statement.alias(),
            handle.0
        );
        self.statements.push(statement);
        handle
    }

    /// Append a deferred predicate to one declaration.
    ///
    /// A handle that does not belong to this registry is a programmer
    /// error and reports as `StaleStatementHandle`.
    pub fn attach_predicate(
        &mut self,
        handle: StatementHandle,
        predicate: Predicate,
    ) -> Result<(), CteBuildError> {
        let statements = self.statements.len();
        let statement =
            self.statements
                .get_mut(handle.0)
                .ok_or(CteBuildError::StaleStatementHandle {
                    handle: handle.0,
                    statements,
                })?;
        statement.push_predicate(predicate);
        Ok(())
    }

    /// Read view consumed by the CTE compiler. Empty means "no WITH clause".
    pub fn snapshot(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
