//! The public query facade.
//!
//! A `QueryBuilder` owns one statement registry and one base query. CTE
//! declaration and constraint attachment happen here; everything else is
//! forwarded to the base query skeleton and compiled by the dialect.

use std::sync::Arc;

use crate::compiler::{compile_with, BindingStrategy};
use crate::dialect::{AnsiDialect, Dialect};
use crate::driver::{QueryExecutor, Row};
use crate::entity::{CteEntity, EntityRegistry, Scope, ScopeRegistry};
use crate::error::CteBuildError;
use crate::fragment::{merge_with_base, CompiledFragment};
use crate::predicate::{CompareOp, Predicate};
use crate::query_ast::{Join, JoinType, OrderBy, OrderDirection, SelectQuery};
use crate::statement::{QueryFactory, StatementHandle, StatementRegistry};

/// One logical query context: an ordered CTE registry plus a base SELECT.
///
/// Contexts are not meant for concurrent mutation; each logical query owns
/// its own, obtained fresh or through `clone()`. Cloning deep-copies the
/// statement list, so predicates attached to a clone never leak back.
#[derive(Debug, Clone)]
pub struct QueryBuilder<D: Dialect = AnsiDialect> {
    dialect: D,
    registry: StatementRegistry,
    scopes: ScopeRegistry,
    entities: EntityRegistry,
    base: SelectQuery,
    strategy: BindingStrategy,
}

impl QueryBuilder<AnsiDialect> {
    pub fn new(base: SelectQuery) -> Self {
        Self::with_dialect(AnsiDialect, base)
    }

    pub fn for_entity(entity: impl CteEntity + 'static) -> Self {
        Self::for_entity_with_dialect(AnsiDialect, entity)
    }
}

impl<D: Dialect> QueryBuilder<D> {
    pub fn with_dialect(dialect: D, base: SelectQuery) -> Self {
        QueryBuilder {
            dialect,
            registry: StatementRegistry::new(),
            scopes: ScopeRegistry::new(),
            entities: EntityRegistry::new(),
            base,
            strategy: BindingStrategy::default(),
        }
    }

    /// Build a context for one entity: the entity becomes the first CTE
    /// declaration and the base query selects from its alias.
    pub fn for_entity_with_dialect(dialect: D, entity: impl CteEntity + 'static) -> Self {
        let base = dialect.from_alias(entity.alias());
        let mut builder = Self::with_dialect(dialect, base);
        builder.with(entity);
        builder
    }

    /// Declare an entity as a CTE. Safe to call repeatedly; duplicate
    /// declarations are kept, not deduplicated.
    pub fn with(&mut self, entity: impl CteEntity + 'static) -> StatementHandle {
        self.with_shared(Arc::new(entity))
    }

    pub fn with_shared(&mut self, entity: Arc<dyn CteEntity>) -> StatementHandle {
        let alias = entity.alias().to_string();
        let factory: QueryFactory = Arc::new(move || entity.with_query());
        self.registry.declare(alias, factory)
    }

    /// Declare a CTE from a bare alias and factory, without an entity.
    pub fn with_factory(
        &mut self,
        alias: impl Into<String>,
        factory: impl Fn() -> SelectQuery + Send + Sync + 'static,
    ) -> StatementHandle {
        self.registry.declare(alias, Arc::new(factory))
    }

    /// Declare a CTE by logical entity name, resolved through the entity
    /// registry.
    pub fn with_named(&mut self, name: &str) -> Result<StatementHandle, CteBuildError> {
        let entity = self.entities.resolve(name)?;
        Ok(self.with_shared(entity))
    }

    pub fn register_entity<E, F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        E: CteEntity + 'static,
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.entities.register(name, constructor);
        self
    }

    pub fn with_scope(
        &mut self,
        identifier: impl Into<String>,
        scope: impl Scope + 'static,
    ) -> &mut Self {
        self.scopes.register(identifier, scope);
        self
    }

    /// Defer a predicate onto one declared statement's subquery.
    pub fn constrain(
        &mut self,
        handle: StatementHandle,
        predicate: Predicate,
    ) -> Result<&mut Self, CteBuildError> {
        self.registry.attach_predicate(handle, predicate)?;
        Ok(self)
    }

    /// Constrain the base query itself (not any CTE).
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.base.filters.push(predicate);
        self
    }

    pub fn select<C: Into<String>>(&mut self, columns: impl IntoIterator<Item = C>) -> &mut Self {
        self.base.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn join(
        &mut self,
        table: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> &mut Self {
        self.push_join(table, left_column, right_column, JoinType::Inner)
    }

    pub fn left_join(
        &mut self,
        table: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> &mut Self {
        self.push_join(table, left_column, right_column, JoinType::Left)
    }

    pub fn right_join(
        &mut self,
        table: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> &mut Self {
        self.push_join(table, left_column, right_column, JoinType::Right)
    }

    fn push_join(
        &mut self,
        table: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
        join_type: JoinType,
    ) -> &mut Self {
        self.base.joins.push(Join {
            table: table.into(),
            alias: None,
            left_column: left_column.into(),
            op: CompareOp::Eq,
            right_column: right_column.into(),
            join_type,
        });
        self
    }

    /// Join an entity: declares it as a CTE, then joins the base query on
    /// its alias. Returns the handle so join-time constraints can follow.
    pub fn join_entity(
        &mut self,
        entity: impl CteEntity + 'static,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
        join_type: JoinType,
    ) -> StatementHandle {
        let entity: Arc<dyn CteEntity> = Arc::new(entity);
        let alias = entity.alias().to_string();
        let handle = self.with_shared(entity);
        self.base.joins.push(Join {
            table: alias,
            alias: None,
            left_column: left_column.into(),
            op: CompareOp::Eq,
            right_column: right_column.into(),
            join_type,
        });
        handle
    }

    pub fn group_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.base.group_by.push(column.into());
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, direction: OrderDirection) -> &mut Self {
        self.base.order_by.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.base.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.base.offset = Some(offset);
        self
    }

    pub fn for_page(&mut self, page: u64, per_page: u64) -> &mut Self {
        self.base.limit = Some(per_page);
        self.base.offset = Some(page.saturating_sub(1) * per_page);
        self
    }

    pub fn binding_strategy(&mut self, strategy: BindingStrategy) -> &mut Self {
        self.strategy = strategy;
        self
    }

    pub fn registry(&self) -> &StatementRegistry {
        &self.registry
    }

    pub fn base_query(&self) -> &SelectQuery {
        &self.base
    }

    /// Compile the whole context: WITH preamble plus the base SELECT, with
    /// bindings aligned left to right across the full statement.
    ///
    /// Compilation reads the context without mutating it; calling this
    /// twice yields byte-identical SQL and identical bindings. Scopes are
    /// applied to a clone of the base query, never to the stored one.
    pub fn compile(&self) -> Result<CompiledFragment, CteBuildError> {
        let mut base = self.base.clone();
        self.scopes.apply_all(&mut base);

        let with = compile_with(self.registry.snapshot(), &self.dialect, self.strategy)?;
        let base = self.dialect.compile(&base)?;
        base.verify_alignment()?;

        let full = merge_with_base(with, base);
        full.verify_alignment()?;
        log::debug!(
            "compiled query: {} ({} bindings)",
            full.sql,
            full.bindings.len()
        );
        Ok(full)
    }

    pub fn to_sql(&self) -> Result<String, CteBuildError> {
        Ok(self.compile()?.sql)
    }

    /// Compile and hand `(sql, bindings)` to the execution collaborator.
    pub fn execute(&self, executor: &dyn QueryExecutor) -> Result<Vec<Row>, CteBuildError> {
        let fragment = self.compile()?;
        Ok(executor.execute(&fragment)?)
    }
}
