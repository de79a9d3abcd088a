//! Scope registry and named-entity resolution.

use cte_query::{CteBuildError, Predicate, QueryBuilder, SelectQuery};

use crate::common::{ActiveUsers, Orders};

#[test]
fn scopes_apply_to_the_base_query_at_compile_time_only() {
    let mut query = QueryBuilder::new(SelectQuery::from("recent_orders"));
    query.with(Orders);
    query.with_scope("tenant", |base: &mut SelectQuery| {
        base.filters.push(Predicate::eq("tenant_id", 42));
    });

    let sql = query.to_sql().unwrap();
    assert!(
        sql.ends_with("SELECT * FROM recent_orders WHERE tenant_id = ?"),
        "got: {}",
        sql
    );
    // The stored base query is untouched; the scope ran on a clone.
    assert!(query.base_query().filters.is_empty());

    // Scopes never reach into CTE subqueries.
    assert!(sql.contains("recent_orders AS (SELECT * FROM orders)"));
}

#[test]
fn scopes_apply_in_registration_order() {
    let mut query = QueryBuilder::new(SelectQuery::from("orders"));
    query.with_scope("first", |base: &mut SelectQuery| {
        base.filters.push(Predicate::eq("a", 1));
    });
    query.with_scope("second", |base: &mut SelectQuery| {
        base.filters.push(Predicate::eq("b", 2));
    });

    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT * FROM orders WHERE a = ? AND b = ?"
    );
}

#[test]
fn named_entities_resolve_through_the_registry() {
    let mut query = QueryBuilder::new(SelectQuery::from("active_users"));
    query.register_entity("users.active", || ActiveUsers);

    let handle = query.with_named("users.active").unwrap();
    query
        .constrain(handle, Predicate::gt("login_count", 3))
        .unwrap();

    assert_eq!(
        query.to_sql().unwrap(),
        "WITH active_users AS (SELECT * FROM users WHERE deleted_at IS NULL AND login_count > ?) \
         SELECT * FROM active_users"
    );
}

#[test]
fn unknown_entity_name_is_an_error() {
    let mut query = QueryBuilder::new(SelectQuery::from("x"));
    assert_eq!(
        query.with_named("nope").unwrap_err(),
        CteBuildError::UnknownEntity("nope".to_string())
    );
}

#[test]
fn for_entity_builds_the_self_declaring_context() {
    let query = QueryBuilder::for_entity(ActiveUsers);
    assert_eq!(
        query.to_sql().unwrap(),
        "WITH active_users AS (SELECT * FROM users WHERE deleted_at IS NULL) \
         SELECT * FROM active_users"
    );
}
