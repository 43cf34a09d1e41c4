//! SQL query AST and compiler.
//!
//! [`Query`] describes a single-table `SELECT` with a filter, an ordering
//! and a slice. [`SqlCompiler`] translates it into a parameterised SQL
//! string. PostgreSQL uses `$1, $2, ...` placeholders; SQLite and MySQL use `?`.

use super::lookups::{Lookup, Q};
use crate::value::Value;

/// The type of database backend, used by the compiler to generate
/// backend-specific SQL syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackendType {
    /// PostgreSQL (uses `$1, $2, ...` placeholders).
    PostgreSQL,
    /// SQLite (uses `?` placeholders).
    SQLite,
    /// MySQL (uses `?` placeholders).
    MySQL,
}

/// A column ordering direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The column to order by.
    pub column: String,
    /// Whether to sort in descending order.
    pub descending: bool,
}

impl OrderBy {
    /// Creates an ascending order.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    /// Creates a descending order.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Parses `"field"` or `"-field"`. Returns `None` for an empty name.
    ///
    /// ```
    /// use viewcraft_db::query::OrderBy;
    ///
    /// assert_eq!(OrderBy::parse("-created"), Some(OrderBy::desc("created")));
    /// assert_eq!(OrderBy::parse("title"), Some(OrderBy::asc("title")));
    /// assert_eq!(OrderBy::parse("-"), None);
    /// ```
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let (column, descending) = spec
            .strip_prefix('-')
            .map_or((spec, false), |rest| (rest, true));
        if column.is_empty() {
            return None;
        }
        Some(Self {
            column: column.to_string(),
            descending,
        })
    }

    /// Renders this ordering back into `"field"` / `"-field"` form.
    pub fn to_param(&self) -> String {
        if self.descending {
            format!("-{}", self.column)
        } else {
            self.column.clone()
        }
    }
}

/// A WHERE clause node in the query AST.
#[derive(Debug, Clone)]
pub enum WhereNode {
    /// A single condition.
    Condition {
        /// The column name.
        column: String,
        /// The lookup type.
        lookup: Lookup,
    },
    /// Logical AND of conditions.
    And(Vec<WhereNode>),
    /// Logical OR of conditions.
    Or(Vec<WhereNode>),
    /// Logical NOT of a condition.
    Not(Box<WhereNode>),
}

impl WhereNode {
    /// Converts a `Q` object into a `WhereNode`.
    pub fn from_q(q: &Q) -> Self {
        match q {
            Q::Filter { field, lookup } => Self::Condition {
                column: field.clone(),
                lookup: lookup.clone(),
            },
            Q::And(children) => Self::And(children.iter().map(Self::from_q).collect()),
            Q::Or(children) => Self::Or(children.iter().map(Self::from_q).collect()),
            Q::Not(inner) => Self::Not(Box::new(Self::from_q(inner))),
        }
    }
}

/// A single-table SELECT query.
#[derive(Debug, Clone)]
pub struct Query {
    /// The table to select from.
    pub table: String,
    /// The WHERE clause, if any.
    pub where_clause: Option<WhereNode>,
    /// ORDER BY columns.
    pub order_by: Vec<OrderBy>,
    /// LIMIT.
    pub limit: Option<usize>,
    /// OFFSET.
    pub offset: Option<usize>,
}

impl Query {
    /// Creates an unfiltered query over `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

/// Compiles [`Query`] ASTs into SQL.
#[derive(Debug, Clone)]
pub struct SqlCompiler {
    backend: DatabaseBackendType,
}

impl SqlCompiler {
    /// Creates a new compiler for the given backend type.
    pub const fn new(backend: DatabaseBackendType) -> Self {
        Self { backend }
    }

    /// Returns a parameter placeholder for the given 1-based index.
    fn placeholder(&self, index: usize) -> String {
        match self.backend {
            DatabaseBackendType::PostgreSQL => format!("${index}"),
            DatabaseBackendType::SQLite | DatabaseBackendType::MySQL => "?".to_string(),
        }
    }

    /// Compiles a SELECT query into SQL and parameters.
    pub fn compile_select(&self, query: &Query) -> (String, Vec<Value>) {
        let mut params: Vec<Value> = Vec::new();
        let mut sql = format!("SELECT * FROM \"{}\"", query.table);

        if let Some(where_clause) = &query.where_clause {
            sql.push_str(" WHERE ");
            self.compile_where_node(where_clause, &mut sql, &mut params);
        }

        if !query.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let parts: Vec<String> = query
                .order_by
                .iter()
                .map(|o| {
                    let dir = if o.descending { "DESC" } else { "ASC" };
                    format!("\"{}\" {dir}", o.column)
                })
                .collect();
            sql.push_str(&parts.join(", "));
        }

        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = query.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        (sql, params)
    }

    /// Compiles a COUNT query. Ordering and slicing are ignored.
    pub fn compile_count(&self, query: &Query) -> (String, Vec<Value>) {
        let mut params: Vec<Value> = Vec::new();
        let mut sql = format!("SELECT COUNT(*) FROM \"{}\"", query.table);
        if let Some(where_clause) = &query.where_clause {
            sql.push_str(" WHERE ");
            self.compile_where_node(where_clause, &mut sql, &mut params);
        }
        (sql, params)
    }

    /// Compiles a `WhereNode` into SQL, appending to the provided string.
    fn compile_where_node(&self, node: &WhereNode, sql: &mut String, params: &mut Vec<Value>) {
        match node {
            WhereNode::Condition { column, lookup } => {
                self.compile_lookup(column, lookup, sql, params);
            }
            WhereNode::And(children) => {
                if children.is_empty() {
                    sql.push_str("1=1");
                    return;
                }
                sql.push('(');
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(" AND ");
                    }
                    self.compile_where_node(child, sql, params);
                }
                sql.push(')');
            }
            WhereNode::Or(children) => {
                if children.is_empty() {
                    sql.push_str("1=0");
                    return;
                }
                sql.push('(');
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(" OR ");
                    }
                    self.compile_where_node(child, sql, params);
                }
                sql.push(')');
            }
            WhereNode::Not(inner) => {
                sql.push_str("NOT (");
                self.compile_where_node(inner, sql, params);
                sql.push(')');
            }
        }
    }

    /// Emits a pattern match, using `ILIKE` on PostgreSQL and `LOWER(..) LIKE`
    /// elsewhere when `insensitive`.
    fn compile_like(
        &self,
        column: &str,
        pattern: String,
        insensitive: bool,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) {
        params.push(Value::String(pattern));
        let ph = self.placeholder(params.len());
        if !insensitive {
            sql.push_str(&format!("\"{column}\" LIKE {ph}"));
            return;
        }
        match self.backend {
            DatabaseBackendType::PostgreSQL => {
                sql.push_str(&format!("\"{column}\" ILIKE {ph}"));
            }
            DatabaseBackendType::SQLite | DatabaseBackendType::MySQL => {
                sql.push_str(&format!("LOWER(\"{column}\") LIKE LOWER({ph})"));
            }
        }
    }

    fn compile_comparison(
        &self,
        column: &str,
        op: &str,
        val: &Value,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) {
        params.push(val.clone());
        let ph = self.placeholder(params.len());
        sql.push_str(&format!("\"{column}\" {op} {ph}"));
    }

    /// Compiles a single lookup into SQL.
    fn compile_lookup(
        &self,
        column: &str,
        lookup: &Lookup,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) {
        match lookup {
            Lookup::Exact(val) => {
                if val.is_null() {
                    sql.push_str(&format!("\"{column}\" IS NULL"));
                } else {
                    self.compile_comparison(column, "=", val, sql, params);
                }
            }
            Lookup::IExact(val) => {
                params.push(val.clone());
                let ph = self.placeholder(params.len());
                sql.push_str(&format!("LOWER(\"{column}\") = LOWER({ph})"));
            }
            Lookup::Contains(val) => {
                self.compile_like(column, format!("%{val}%"), false, sql, params);
            }
            Lookup::IContains(val) => {
                self.compile_like(column, format!("%{val}%"), true, sql, params);
            }
            Lookup::StartsWith(val) => {
                self.compile_like(column, format!("{val}%"), false, sql, params);
            }
            Lookup::IStartsWith(val) => {
                self.compile_like(column, format!("{val}%"), true, sql, params);
            }
            Lookup::EndsWith(val) => {
                self.compile_like(column, format!("%{val}"), false, sql, params);
            }
            Lookup::IEndsWith(val) => {
                self.compile_like(column, format!("%{val}"), true, sql, params);
            }
            Lookup::In(vals) => {
                if vals.is_empty() {
                    sql.push_str("1=0");
                    return;
                }
                let placeholders: Vec<String> = vals
                    .iter()
                    .map(|v| {
                        params.push(v.clone());
                        self.placeholder(params.len())
                    })
                    .collect();
                sql.push_str(&format!("\"{column}\" IN ({})", placeholders.join(", ")));
            }
            Lookup::Gt(val) => self.compile_comparison(column, ">", val, sql, params),
            Lookup::Gte(val) => self.compile_comparison(column, ">=", val, sql, params),
            Lookup::Lt(val) => self.compile_comparison(column, "<", val, sql, params),
            Lookup::Lte(val) => self.compile_comparison(column, "<=", val, sql, params),
            Lookup::Range(low, high) => {
                params.push(low.clone());
                let ph_low = self.placeholder(params.len());
                params.push(high.clone());
                let ph_high = self.placeholder(params.len());
                sql.push_str(&format!("\"{column}\" BETWEEN {ph_low} AND {ph_high}"));
            }
            Lookup::IsNull(is_null) => {
                if *is_null {
                    sql.push_str(&format!("\"{column}\" IS NULL"));
                } else {
                    sql.push_str(&format!("\"{column}\" IS NOT NULL"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg() -> SqlCompiler {
        SqlCompiler::new(DatabaseBackendType::PostgreSQL)
    }

    fn sqlite() -> SqlCompiler {
        SqlCompiler::new(DatabaseBackendType::SQLite)
    }

    fn where_query(table: &str, q: &Q) -> Query {
        let mut query = Query::new(table);
        query.where_clause = Some(WhereNode::from_q(q));
        query
    }

    #[test]
    fn test_simple_select() {
        let (sql, params) = pg().compile_select(&Query::new("posts"));
        assert_eq!(sql, "SELECT * FROM \"posts\"");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_with_and_where_pg() {
        let q = Q::filter("status", Lookup::Exact(Value::from("published")))
            & Q::filter("views", Lookup::Gte(Value::from(10)));
        let (sql, params) = pg().compile_select(&where_query("posts", &q));
        assert_eq!(
            sql,
            "SELECT * FROM \"posts\" WHERE (\"status\" = $1 AND \"views\" >= $2)"
        );
        assert_eq!(params, vec![Value::from("published"), Value::from(10)]);
    }

    #[test]
    fn test_select_with_or_where_sqlite() {
        let q = Q::filter("title", Lookup::IContains("rust".into()))
            | Q::filter("body", Lookup::IContains("rust".into()));
        let (sql, params) = sqlite().compile_select(&where_query("posts", &q));
        assert_eq!(
            sql,
            "SELECT * FROM \"posts\" WHERE (LOWER(\"title\") LIKE LOWER(?) OR LOWER(\"body\") LIKE LOWER(?))"
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], Value::from("%rust%"));
    }

    #[test]
    fn test_icontains_pg_uses_ilike() {
        let q = Q::filter("title", Lookup::IContains("rust".into()));
        let (sql, _) = pg().compile_select(&where_query("posts", &q));
        assert!(sql.contains("\"title\" ILIKE $1"));
    }

    #[test]
    fn test_not_where() {
        let q = !Q::filter("draft", Lookup::Exact(Value::from(true)));
        let (sql, _) = pg().compile_select(&where_query("posts", &q));
        assert_eq!(sql, "SELECT * FROM \"posts\" WHERE NOT (\"draft\" = $1)");
    }

    #[test]
    fn test_range_and_in() {
        let q = Q::filter("price", Lookup::Range(Value::from(10), Value::from(100)))
            & Q::filter("id", Lookup::In(vec![Value::from(1), Value::from(2)]));
        let (sql, params) = pg().compile_select(&where_query("products", &q));
        assert_eq!(
            sql,
            "SELECT * FROM \"products\" WHERE (\"price\" BETWEEN $1 AND $2 AND \"id\" IN ($3, $4))"
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let q = Q::filter("id", Lookup::In(vec![]));
        let (sql, params) = pg().compile_select(&where_query("t", &q));
        assert_eq!(sql, "SELECT * FROM \"t\" WHERE 1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn test_is_null_and_exact_null() {
        let q = Q::filter("bio", Lookup::IsNull(false)) & Q::filter("x", Lookup::Exact(Value::Null));
        let (sql, params) = pg().compile_select(&where_query("users", &q));
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" WHERE (\"bio\" IS NOT NULL AND \"x\" IS NULL)"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_order_limit_offset() {
        let mut query = Query::new("posts");
        query.order_by = vec![OrderBy::desc("published_at"), OrderBy::asc("title")];
        query.limit = Some(10);
        query.offset = Some(20);
        let (sql, _) = pg().compile_select(&query);
        assert_eq!(
            sql,
            "SELECT * FROM \"posts\" ORDER BY \"published_at\" DESC, \"title\" ASC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_count_ignores_slice() {
        let mut query = where_query("posts", &Q::filter("views", Lookup::Gt(Value::from(5))));
        query.limit = Some(3);
        let (sql, params) = sqlite().compile_count(&query);
        assert_eq!(sql, "SELECT COUNT(*) FROM \"posts\" WHERE \"views\" > ?");
        assert_eq!(params, vec![Value::from(5)]);
    }

    #[test]
    fn test_order_by_param_roundtrip() {
        assert_eq!(OrderBy::desc("views").to_param(), "-views");
        assert_eq!(OrderBy::parse(" title "), Some(OrderBy::asc("title")));
        assert_eq!(OrderBy::parse(""), None);
    }
}
