//! WITH-clause assembly: ordering, duplicates, empty registry, pass-throughs.

use cte_query::{JoinType, OrderDirection, Predicate, QueryBuilder, SelectQuery, Value};

use crate::common::{ActiveUsers, Orders, RecordingExecutor};

#[test]
fn empty_registry_emits_no_with_keyword() {
    let query = QueryBuilder::new(SelectQuery::from("orders"));
    let fragment = query.compile().unwrap();
    assert_eq!(fragment.sql, "SELECT * FROM orders");
    assert!(fragment.bindings.is_empty());
    assert!(!fragment.sql.contains("WITH"));
}

#[test]
fn statements_emit_in_declaration_order_regardless_of_predicate_complexity() {
    let mut query = QueryBuilder::new(SelectQuery::from("a"));
    let a = query.with_factory("a", || SelectQuery::from("t1"));
    query.with_factory("b", || SelectQuery::from("t2"));
    let c = query.with_factory("c", || SelectQuery::from("t3"));

    // Heavier constraints on A and C must not reorder anything.
    query
        .constrain(
            a,
            Predicate::any_of(vec![
                Predicate::eq("x", 1),
                Predicate::between("y", 2, 3),
            ]),
        )
        .unwrap();
    query
        .constrain(c, Predicate::is_in("z", vec![4, 5, 6]))
        .unwrap();

    let sql = query.to_sql().unwrap();
    let a_pos = sql.find("a AS").unwrap();
    let b_pos = sql.find("b AS").unwrap();
    let c_pos = sql.find("c AS").unwrap();
    assert!(a_pos < b_pos && b_pos < c_pos, "reordered: {}", sql);
}

#[test]
fn duplicate_declarations_emit_one_entry_each() {
    let mut query = QueryBuilder::new(SelectQuery::from("recent_orders"));
    query.with(Orders);
    query.with(Orders);

    assert_eq!(
        query.to_sql().unwrap(),
        "WITH recent_orders AS (SELECT * FROM orders), \
         recent_orders AS (SELECT * FROM orders) SELECT * FROM recent_orders"
    );
}

#[test]
fn predicates_compile_in_attach_order() {
    let mut query = QueryBuilder::new(SelectQuery::from("recent_orders"));
    let handle = query.with(Orders);
    query.constrain(handle, Predicate::eq("p1", 1)).unwrap();
    query.constrain(handle, Predicate::eq("p2", 2)).unwrap();

    let sql = query.to_sql().unwrap();
    assert!(sql.contains("WHERE p1 = ? AND p2 = ?"), "got: {}", sql);
}

#[test]
fn entity_baked_in_filters_come_before_deferred_ones() {
    let mut query = QueryBuilder::new(SelectQuery::from("active_users"));
    let handle = query.with(ActiveUsers);
    query
        .constrain(handle, Predicate::gt("login_count", 10))
        .unwrap();

    assert_eq!(
        query.to_sql().unwrap(),
        "WITH active_users AS \
         (SELECT * FROM users WHERE deleted_at IS NULL AND login_count > ?) \
         SELECT * FROM active_users"
    );
}

#[test]
fn worked_example_from_the_docs() -> anyhow::Result<()> {
    crate::common::init_logging();

    let mut query = QueryBuilder::new(SelectQuery::from("recent_orders"));
    let handle = query.with(Orders);
    query.constrain(handle, Predicate::eq("status", "paid"))?;

    let fragment = query.compile()?;
    assert_eq!(
        fragment.sql,
        "WITH recent_orders AS (SELECT * FROM orders WHERE status = ?) \
         SELECT * FROM recent_orders"
    );
    assert_eq!(fragment.bindings, vec![Value::from("paid")]);
    Ok(())
}

#[test]
fn pass_through_clauses_land_on_the_base_query() {
    let mut query = QueryBuilder::new(SelectQuery::from("recent_orders"));
    query.with(Orders);
    query
        .select(["user_id", "count(*) AS n"])
        .filter(Predicate::is_not_null("user_id"))
        .group_by("user_id")
        .order_by("n", OrderDirection::Desc)
        .for_page(3, 10);

    assert_eq!(
        query.to_sql().unwrap(),
        "WITH recent_orders AS (SELECT * FROM orders) \
         SELECT user_id, count(*) AS n FROM recent_orders \
         WHERE user_id IS NOT NULL GROUP BY user_id ORDER BY n DESC LIMIT 10 OFFSET 20"
    );
}

#[test]
fn base_query_joins_carry_their_join_type() {
    let mut query = QueryBuilder::new(SelectQuery::from("users"));
    query.with(Orders);
    query
        .left_join("recent_orders", "users.id", "recent_orders.user_id")
        .right_join("payments", "users.id", "payments.user_id")
        .join("addresses", "users.id", "addresses.user_id");

    assert_eq!(
        query.to_sql().unwrap(),
        "WITH recent_orders AS (SELECT * FROM orders) SELECT * FROM users \
         LEFT JOIN recent_orders ON users.id = recent_orders.user_id \
         RIGHT JOIN payments ON users.id = payments.user_id \
         INNER JOIN addresses ON users.id = addresses.user_id"
    );
}

#[test]
fn join_entity_declares_the_cte_and_joins_on_its_alias() {
    let mut query = QueryBuilder::new(SelectQuery::from("users"));
    let handle = query.join_entity(Orders, "users.id", "recent_orders.user_id", JoinType::Left);
    query.constrain(handle, Predicate::eq("status", "paid")).unwrap();

    assert_eq!(
        query.to_sql().unwrap(),
        "WITH recent_orders AS (SELECT * FROM orders WHERE status = ?) \
         SELECT * FROM users LEFT JOIN recent_orders ON users.id = recent_orders.user_id"
    );
}

#[test]
fn execute_hands_the_compiled_fragment_to_the_driver() {
    let mut query = QueryBuilder::new(SelectQuery::from("recent_orders"));
    let handle = query.with(Orders);
    query
        .constrain(handle, Predicate::eq("status", "paid"))
        .unwrap();

    let executor = RecordingExecutor::default();
    query.execute(&executor).unwrap();

    let executed = executor.executed.lock().unwrap();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0], query.compile().unwrap());
}

#[test]
fn empty_factory_result_reports_the_alias() {
    let mut query = QueryBuilder::new(SelectQuery::from("x"));
    query.with_factory("broken", || SelectQuery::from(""));

    let err = query.compile().unwrap_err();
    assert_eq!(
        err,
        cte_query::CteBuildError::EmptyFactoryResult("broken".to_string())
    );
}
