//! Lazy querysets over in-memory rows.
//!
//! A [`QuerySet`] accumulates a filter, an ordering and a slice without
//! doing any work. Terminal methods ([`fetch`](QuerySet::fetch),
//! [`count`](QuerySet::count)) evaluate it against the shared rows, and
//! [`to_sql`](QuerySet::to_sql) renders the same query for a SQL backend.
//!
//! # Examples
//!
//! ```
//! use viewcraft_db::query::{Lookup, OrderBy, QuerySet, Q};
//! use viewcraft_db::value::Value;
//!
//! let qs = QuerySet::from_rows("posts", vec![
//!     serde_json::json!({"title": "b", "views": 3}),
//!     serde_json::json!({"title": "a", "views": 12}),
//! ]);
//!
//! let popular = qs
//!     .filter(Q::filter("views", Lookup::Gt(Value::from(5))))
//!     .order_by(vec![OrderBy::asc("title")]);
//! assert_eq!(popular.count(), 1);
//! ```

use std::cmp::Ordering;
use std::sync::Arc;

use super::compiler::{DatabaseBackendType, OrderBy, Query, SqlCompiler, WhereNode};
use super::lookups::{field_value, Q};
use crate::value::Value;

/// A lazy, cloneable query over a shared set of JSON rows.
///
/// Cloning a `QuerySet` is cheap: the rows are reference counted and only
/// the query description is copied.
#[derive(Debug, Clone)]
pub struct QuerySet {
    table: String,
    rows: Arc<Vec<serde_json::Value>>,
    where_clause: Option<Q>,
    order_by: Vec<OrderBy>,
    offset: Option<usize>,
    limit: Option<usize>,
    is_none: bool,
}

impl QuerySet {
    /// Creates an unfiltered queryset over `rows`, named `table` for SQL output.
    pub fn from_rows(table: impl Into<String>, rows: Vec<serde_json::Value>) -> Self {
        Self::from_shared(table, Arc::new(rows))
    }

    /// Creates an unfiltered queryset over rows that are already shared.
    pub fn from_shared(table: impl Into<String>, rows: Arc<Vec<serde_json::Value>>) -> Self {
        Self {
            table: table.into(),
            rows,
            where_clause: None,
            order_by: Vec::new(),
            offset: None,
            limit: None,
            is_none: false,
        }
    }

    /// Returns the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the accumulated filter, if any.
    pub fn where_clause(&self) -> Option<&Q> {
        self.where_clause.as_ref()
    }

    /// Returns the current ordering.
    pub fn ordering(&self) -> &[OrderBy] {
        &self.order_by
    }

    /// Narrows the queryset to rows matching `q`. An empty AND is ignored.
    pub fn filter(mut self, q: Q) -> Self {
        if matches!(&q, Q::And(children) if children.is_empty()) {
            return self;
        }
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing & q,
            None => q,
        });
        self
    }

    /// Removes rows matching `q`.
    pub fn exclude(self, q: Q) -> Self {
        self.filter(!q)
    }

    /// Replaces the ordering.
    pub fn order_by(mut self, fields: Vec<OrderBy>) -> Self {
        self.order_by = fields;
        self
    }

    /// Skips the first `n` rows.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Returns at most `n` rows.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Restricts to the half-open row range `start..end`.
    pub fn slice(self, start: usize, end: usize) -> Self {
        self.offset(start).limit(end.saturating_sub(start))
    }

    /// Returns a queryset that matches nothing.
    pub fn none(mut self) -> Self {
        self.is_none = true;
        self
    }

    fn matching(&self) -> Vec<&serde_json::Value> {
        if self.is_none {
            return Vec::new();
        }
        self.rows
            .iter()
            .filter(|row| self.where_clause.as_ref().map_or(true, |q| q.matches(row)))
            .collect()
    }

    /// Counts matching rows, ignoring any slice.
    pub fn count(&self) -> usize {
        self.matching().len()
    }

    /// Returns `true` if any row matches.
    pub fn exists(&self) -> bool {
        self.count() > 0
    }

    /// Evaluates the queryset: filter, then order, then slice.
    pub fn fetch(&self) -> Vec<serde_json::Value> {
        let mut rows = self.matching();

        if !self.order_by.is_empty() {
            rows.sort_by(|a, b| compare_rows(a, b, &self.order_by));
        }

        let matched = rows.len();
        let rows: Vec<serde_json::Value> = rows
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        tracing::trace!(table = %self.table, matched, returned = rows.len(), "queryset evaluated");
        rows
    }

    fn to_query(&self) -> Query {
        let mut query = Query::new(self.table.clone());
        query.where_clause = if self.is_none {
            Some(WhereNode::Or(Vec::new()))
        } else {
            self.where_clause.as_ref().map(WhereNode::from_q)
        };
        query.order_by.clone_from(&self.order_by);
        query.limit = self.limit;
        query.offset = self.offset;
        query
    }

    /// Renders the queryset as a parameterised SELECT for `backend`.
    pub fn to_sql(&self, backend: DatabaseBackendType) -> (String, Vec<Value>) {
        SqlCompiler::new(backend).compile_select(&self.to_query())
    }

    /// Renders the queryset as a parameterised COUNT for `backend`.
    pub fn count_sql(&self, backend: DatabaseBackendType) -> (String, Vec<Value>) {
        SqlCompiler::new(backend).compile_count(&self.to_query())
    }
}

/// Orders two rows by each key in turn. NULLs sort first ascending.
fn compare_rows(a: &serde_json::Value, b: &serde_json::Value, order_by: &[OrderBy]) -> Ordering {
    for order in order_by {
        let left = field_value(a, &order.column);
        let right = field_value(b, &order.column);
        let ord = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
        };
        let ord = if order.descending { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
