//! Entity and scope seams toward the ORM layer.
//!
//! An entity supplies the alias and the subquery factory a declaration
//! needs; nothing here assumes how entities are produced. Entity and scope
//! registries are explicit objects owned by the query context, never
//! process-wide state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::CteBuildError;
use crate::query_ast::SelectQuery;

/// A reusable definition that can be declared as a CTE.
pub trait CteEntity: Send + Sync {
    /// The WITH-clause name, also the table name when the CTE is
    /// referenced in the main query's FROM/JOIN.
    fn alias(&self) -> &str;

    /// Produce a fresh, unconstrained subquery for the CTE body.
    fn with_query(&self) -> SelectQuery;
}

impl fmt::Debug for dyn CteEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CteEntity")
            .field("alias", &self.alias())
            .finish()
    }
}

type EntityConstructor = Arc<dyn Fn() -> Arc<dyn CteEntity> + Send + Sync>;

/// Maps logical entity names to constructor functions, resolved at
/// declaration time.
#[derive(Clone, Default)]
pub struct EntityRegistry {
    constructors: HashMap<String, EntityConstructor>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E, F>(&mut self, name: impl Into<String>, constructor: F)
    where
        E: CteEntity + 'static,
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.constructors.insert(
            name.into(),
            Arc::new(move || Arc::new(constructor()) as Arc<dyn CteEntity>),
        );
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn CteEntity>, CteBuildError> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| CteBuildError::UnknownEntity(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("EntityRegistry")
            .field("entities", &names)
            .finish()
    }
}

/// A conditional set of filters applied to the base query at compile time.
pub trait Scope: Send + Sync {
    fn apply(&self, query: &mut SelectQuery);
}

impl<F> Scope for F
where
    F: Fn(&mut SelectQuery) + Send + Sync,
{
    fn apply(&self, query: &mut SelectQuery) {
        self(query)
    }
}

/// Ordered, identifier-keyed scope collection owned by one query context.
///
/// Registering under an existing identifier replaces that scope in place;
/// application order otherwise follows registration order.
#[derive(Clone, Default)]
pub struct ScopeRegistry {
    scopes: Vec<(String, Arc<dyn Scope>)>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, identifier: impl Into<String>, scope: impl Scope + 'static) {
        let identifier = identifier.into();
        let scope: Arc<dyn Scope> = Arc::new(scope);
        if let Some(slot) = self.scopes.iter_mut().find(|(id, _)| *id == identifier) {
            slot.1 = scope;
        } else {
            self.scopes.push((identifier, scope));
        }
    }

    pub fn apply_all(&self, query: &mut SelectQuery) {
        for (identifier, scope) in &self.scopes {
            log::trace!("applying scope '{}'", identifier);
            scope.apply(query);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.scopes.iter().map(|(id, _)| id.as_str()).collect();
        f.debug_struct("ScopeRegistry")
            .field("scopes", &names)
            .finish()
    }
}
