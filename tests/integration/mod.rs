//! Integration tests for the CTE query facade.

mod common;

mod clone_isolation_tests;
mod cte_compilation_tests;
mod scope_and_entity_tests;
