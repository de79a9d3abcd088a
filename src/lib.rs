//! cte-query - Common Table Expression support for query compilers
//!
//! This crate augments a relational query compiler with CTEs through:
//! - An ordered, append-only registry of named subquery declarations
//! - Deferred constraints, applied to subqueries at compile time
//! - `WITH ...` preamble generation ahead of a base SELECT
//! - Positional placeholder/binding alignment across the whole statement
//!
//! The SELECT/WHERE machinery itself is delegated to a [`Dialect`]; a
//! minimal ANSI implementation is built in and swappable.

pub mod compiler;
pub mod dialect;
pub mod driver;
pub mod entity;
pub mod error;
pub mod fragment;
pub mod predicate;
pub mod query;
pub mod query_ast;
pub mod statement;
pub mod value;

pub use compiler::{compile_with, inline_bindings, BindingStrategy};
pub use dialect::{AnsiDialect, Dialect};
pub use driver::{ExecuteError, QueryExecutor, Row};
pub use entity::{CteEntity, EntityRegistry, Scope, ScopeRegistry};
pub use error::CteBuildError;
pub use fragment::{count_placeholders, merge_with_base, CompiledFragment};
pub use predicate::{CompareOp, Connector, Predicate};
pub use query::QueryBuilder;
pub use query_ast::{FromTable, Join, JoinType, OrderBy, OrderDirection, SelectQuery};
pub use statement::{QueryFactory, Statement, StatementHandle, StatementRegistry};
pub use value::Value;
