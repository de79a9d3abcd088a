//! Grammar/dialect seam.
//!
//! The CTE layer never renders SELECT bodies itself; it asks a [`Dialect`]
//! to compile each [`SelectQuery`] skeleton into text plus ordered
//! bindings. [`AnsiDialect`] is the built-in generic implementation;
//! product-specific grammars plug in through the same trait.

use crate::error::CteBuildError;
use crate::fragment::CompiledFragment;
use crate::predicate::Predicate;
use crate::query_ast::SelectQuery;
use crate::value::Value;

pub trait Dialect {
    /// Compile a subquery skeleton into SQL text with `?` placeholders and
    /// the bindings they consume, in placeholder order.
    fn compile(&self, query: &SelectQuery) -> Result<CompiledFragment, CteBuildError>;

    /// A fresh skeleton selecting everything from a named table or CTE alias.
    fn from_alias(&self, alias: &str) -> SelectQuery {
        SelectQuery::from(alias)
    }
}

/// Minimal ANSI-flavored dialect used as the default base compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl Dialect for AnsiDialect {
    fn compile(&self, query: &SelectQuery) -> Result<CompiledFragment, CteBuildError> {
        let mut sql = String::new();
        let mut bindings: Vec<Value> = Vec::new();

        sql.push_str("SELECT ");
        if query.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&query.columns.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&query.from.name);
        if let Some(alias) = &query.from.alias {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }

        for join in &query.joins {
            sql.push(' ');
            sql.push_str(join.join_type.as_sql());
            sql.push(' ');
            sql.push_str(&join.table);
            if let Some(alias) = &join.alias {
                sql.push_str(" AS ");
                sql.push_str(alias);
            }
            sql.push_str(" ON ");
            sql.push_str(&join.left_column);
            sql.push(' ');
            sql.push_str(join.op.as_sql());
            sql.push(' ');
            sql.push_str(&join.right_column);
        }

        let where_sql = render_filters(&query.filters, &mut bindings);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !query.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&query.group_by.join(", "));
        }

        if !query.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let items: Vec<String> = query
                .order_by
                .iter()
                .map(|item| format!("{} {}", item.column, item.direction.as_sql()))
                .collect();
            sql.push_str(&items.join(", "));
        }

        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = query.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        Ok(CompiledFragment::new(sql, bindings))
    }
}

/// Render an AND-composed filter list, pushing bindings in encounter order.
fn render_filters(predicates: &[Predicate], bindings: &mut Vec<Value>) -> String {
    let mut parts = Vec::new();
    for predicate in predicates {
        if let Some(sql) = render_predicate(predicate, bindings) {
            parts.push(sql);
        }
    }
    parts.join(" AND ")
}

fn render_predicate(predicate: &Predicate, bindings: &mut Vec<Value>) -> Option<String> {
    match predicate {
        Predicate::Comparison { column, op, value } => {
            bindings.push(value.clone());
            Some(format!("{} {} ?", column, op.as_sql()))
        }
        Predicate::In {
            column,
            values,
            negated,
        } => {
            if values.is_empty() {
                // An empty IN list can never match; NOT IN always does.
                return Some(if *negated { "1 = 1" } else { "0 = 1" }.to_string());
            }
            let marks = vec!["?"; values.len()].join(", ");
            bindings.extend(values.iter().cloned());
            let keyword = if *negated { "NOT IN" } else { "IN" };
            Some(format!("{} {} ({})", column, keyword, marks))
        }
        Predicate::Between {
            column,
            low,
            high,
            negated,
        } => {
            bindings.push(low.clone());
            bindings.push(high.clone());
            let keyword = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
            Some(format!("{} {} ? AND ?", column, keyword))
        }
        Predicate::Null { column, negated } => {
            let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
            Some(format!("{} {}", column, keyword))
        }
        Predicate::Raw {
            sql,
            bindings: raw_bindings,
        } => {
            bindings.extend(raw_bindings.iter().cloned());
            // Wrap raw fragments so they combine safely with siblings.
            Some(format!("({})", sql))
        }
        Predicate::Nested {
            predicates,
            connector,
        } => {
            let mut parts = Vec::new();
            for nested in predicates {
                if let Some(sql) = render_predicate(nested, bindings) {
                    parts.push(sql);
                }
            }
            if parts.is_empty() {
                return None;
            }
            Some(format!(
                "({})",
                parts.join(&format!(" {} ", connector.as_sql()))
            ))
        }
    }
}
