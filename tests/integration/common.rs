//! Shared fixtures: test entities and a recording executor.

use std::sync::Mutex;

use cte_query::{
    CompiledFragment, CteEntity, ExecuteError, Predicate, QueryExecutor, Row, SelectQuery,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Orders;

impl CteEntity for Orders {
    fn alias(&self) -> &str {
        "recent_orders"
    }

    fn with_query(&self) -> SelectQuery {
        SelectQuery::from("orders")
    }
}

pub struct ActiveUsers;

impl CteEntity for ActiveUsers {
    fn alias(&self) -> &str {
        "active_users"
    }

    fn with_query(&self) -> SelectQuery {
        SelectQuery::from("users").and_where(Predicate::is_null("deleted_at"))
    }
}

/// Captures the compiled fragment handed to the driver.
#[derive(Default)]
pub struct RecordingExecutor {
    pub executed: Mutex<Vec<CompiledFragment>>,
}

impl QueryExecutor for RecordingExecutor {
    fn execute(&self, fragment: &CompiledFragment) -> Result<Vec<Row>, ExecuteError> {
        self.executed.lock().unwrap().push(fragment.clone());
        Ok(Vec::new())
    }
}
