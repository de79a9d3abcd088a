//! Clone semantics: a cloned context owns an independent statement list.

use cte_query::{Predicate, QueryBuilder, SelectQuery};

use crate::common::Orders;

#[test]
fn predicates_attached_to_a_clone_do_not_leak_back() {
    let mut original = QueryBuilder::new(SelectQuery::from("recent_orders"));
    let handle = original.with(Orders);
    original
        .constrain(handle, Predicate::eq("status", "paid"))
        .unwrap();

    let mut scoped = original.clone();
    scoped
        .constrain(handle, Predicate::gt("total", 500))
        .unwrap();

    let original_sql = original.to_sql().unwrap();
    let scoped_sql = scoped.to_sql().unwrap();

    assert!(original_sql.contains("WHERE status = ?)"));
    assert!(!original_sql.contains("total"));
    assert!(scoped_sql.contains("WHERE status = ? AND total > ?)"));
}

#[test]
fn base_query_filters_are_isolated_too() {
    let mut original = QueryBuilder::new(SelectQuery::from("recent_orders"));
    original.with(Orders);

    let mut clone = original.clone();
    clone.filter(Predicate::is_null("archived_at"));

    assert!(!original.to_sql().unwrap().contains("archived_at"));
    assert!(clone.to_sql().unwrap().contains("archived_at IS NULL"));
}

#[test]
fn declarations_on_a_clone_stay_on_the_clone() {
    let original = QueryBuilder::new(SelectQuery::from("recent_orders"));

    let mut clone = original.clone();
    clone.with(Orders);

    assert_eq!(original.registry().len(), 0);
    assert_eq!(clone.registry().len(), 1);
    assert_eq!(original.to_sql().unwrap(), "SELECT * FROM recent_orders");
}

#[test]
fn compiling_never_mutates_the_context() {
    let mut query = QueryBuilder::new(SelectQuery::from("recent_orders"));
    let handle = query.with(Orders);
    query
        .constrain(handle, Predicate::eq("status", "paid"))
        .unwrap();

    let before = query.to_sql().unwrap();
    for _ in 0..3 {
        assert_eq!(query.to_sql().unwrap(), before);
    }
    assert_eq!(query.registry().snapshot()[0].predicates().len(), 1);
}
