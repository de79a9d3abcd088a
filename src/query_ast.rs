//! The abstract subquery skeleton handed to a [`Dialect`](crate::dialect::Dialect).
//!
//! A `SelectQuery` carries clause data only; SQL text and bindings come out
//! of the dialect that compiles it. Entity factories produce a fresh
//! skeleton on every call so repeated compilation never mutates shared
//! state.

use serde::{Deserialize, Serialize};

use crate::predicate::{CompareOp, Predicate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromTable {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub table: String,
    /// Rendered as `table AS alias` when present.
    pub alias: Option<String>,
    pub left_column: String,
    pub op: CompareOp,
    pub right_column: String,
    pub join_type: JoinType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

/// One SELECT definition: the base query of a context, or a CTE subquery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectQuery {
    /// Selected columns; empty means `*`.
    pub columns: Vec<String>,
    pub from: FromTable,
    pub joins: Vec<Join>,
    /// AND-composed in order.
    pub filters: Vec<Predicate>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectQuery {
    pub fn from(table: impl Into<String>) -> Self {
        SelectQuery {
            columns: Vec::new(),
            from: FromTable {
                name: table.into(),
                alias: None,
            },
            joins: Vec::new(),
            filters: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn from_aliased(table: impl Into<String>, alias: impl Into<String>) -> Self {
        let mut query = Self::from(table);
        query.from.alias = Some(alias.into());
        query
    }

    pub fn select<C: Into<String>>(mut self, columns: impl IntoIterator<Item = C>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn join(
        mut self,
        table: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        self.joins.push(Join {
            table: table.into(),
            alias: None,
            left_column: left_column.into(),
            op: CompareOp::Eq,
            right_column: right_column.into(),
            join_type: JoinType::Inner,
        });
        self
    }

    pub fn left_join(
        mut self,
        table: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        self.joins.push(Join {
            table: table.into(),
            alias: None,
            left_column: left_column.into(),
            op: CompareOp::Eq,
            right_column: right_column.into(),
            join_type: JoinType::Left,
        });
        self
    }

    pub fn join_with(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Pagination shorthand: page numbers start at 1.
    pub fn for_page(self, page: u64, per_page: u64) -> Self {
        self.limit(per_page).offset(page.saturating_sub(1) * per_page)
    }
}
