//! Query lookups and Q objects for building complex filters.
//!
//! [`Lookup`] is a field-level comparison and [`Q`] combines lookups with
//! AND, OR, and NOT. A `Q` tree can be compiled to SQL by the
//! [`SqlCompiler`](super::compiler::SqlCompiler) or evaluated directly
//! against a JSON row with [`Q::matches`].
//!
//! # Examples
//!
//! ```
//! use viewcraft_db::query::lookups::{Q, Lookup};
//! use viewcraft_db::value::Value;
//!
//! // name = "Alice" AND age > 25
//! let q = Q::filter("name", Lookup::Exact(Value::from("Alice")))
//!     & Q::filter("age", Lookup::Gt(Value::from(25)));
//!
//! let row = serde_json::json!({"name": "Alice", "age": 30});
//! assert!(q.matches(&row));
//! ```

use std::cmp::Ordering;
use std::ops;

use crate::value::Value;

/// A field-level lookup operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Exact match (`field = value`).
    Exact(Value),
    /// Case-insensitive exact match (`LOWER(field) = LOWER(value)`).
    IExact(Value),
    /// Substring match (`field LIKE '%value%'`).
    Contains(String),
    /// Case-insensitive substring match.
    IContains(String),
    /// Membership test (`field IN (values...)`).
    In(Vec<Value>),
    /// Greater than (`field > value`).
    Gt(Value),
    /// Greater than or equal (`field >= value`).
    Gte(Value),
    /// Less than (`field < value`).
    Lt(Value),
    /// Less than or equal (`field <= value`).
    Lte(Value),
    /// Starts with (`field LIKE 'value%'`).
    StartsWith(String),
    /// Case-insensitive starts with.
    IStartsWith(String),
    /// Ends with (`field LIKE '%value'`).
    EndsWith(String),
    /// Case-insensitive ends with.
    IEndsWith(String),
    /// Inclusive range test (`field BETWEEN low AND high`).
    Range(Value, Value),
    /// NULL test (`field IS NULL` or `field IS NOT NULL`).
    IsNull(bool),
}

impl Lookup {
    /// Returns the lookup's name as it appears in `field__lookup` notation.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::IExact(_) => "iexact",
            Self::Contains(_) => "contains",
            Self::IContains(_) => "icontains",
            Self::In(_) => "in",
            Self::Gt(_) => "gt",
            Self::Gte(_) => "gte",
            Self::Lt(_) => "lt",
            Self::Lte(_) => "lte",
            Self::StartsWith(_) => "startswith",
            Self::IStartsWith(_) => "istartswith",
            Self::EndsWith(_) => "endswith",
            Self::IEndsWith(_) => "iendswith",
            Self::Range(..) => "range",
            Self::IsNull(_) => "isnull",
        }
    }

    /// Tests a field value against this lookup.
    ///
    /// Values that cannot be compared (a string that is not a date, NULL in
    /// an ordering comparison) never match.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Exact(expected) => equals(value, expected),
            Self::IExact(expected) => match (value.as_text(), expected.as_str()) {
                (Some(actual), Some(expected)) => actual.to_lowercase() == expected.to_lowercase(),
                _ => equals(value, expected),
            },
            Self::Contains(needle) => text_matches(value, |t| t.contains(needle.as_str())),
            Self::IContains(needle) => {
                let needle = needle.to_lowercase();
                text_matches(value, |t| t.to_lowercase().contains(&needle))
            }
            Self::StartsWith(prefix) => text_matches(value, |t| t.starts_with(prefix.as_str())),
            Self::IStartsWith(prefix) => {
                let prefix = prefix.to_lowercase();
                text_matches(value, |t| t.to_lowercase().starts_with(&prefix))
            }
            Self::EndsWith(suffix) => text_matches(value, |t| t.ends_with(suffix.as_str())),
            Self::IEndsWith(suffix) => {
                let suffix = suffix.to_lowercase();
                text_matches(value, |t| t.to_lowercase().ends_with(&suffix))
            }
            Self::In(candidates) => candidates.iter().any(|c| equals(value, c)),
            Self::Gt(bound) => value.compare(bound) == Some(Ordering::Greater),
            Self::Gte(bound) => matches!(
                value.compare(bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt(bound) => value.compare(bound) == Some(Ordering::Less),
            Self::Lte(bound) => {
                matches!(value.compare(bound), Some(Ordering::Less | Ordering::Equal))
            }
            Self::Range(low, high) => {
                Self::Gte(low.clone()).matches(value) && Self::Lte(high.clone()).matches(value)
            }
            Self::IsNull(expected) => value.is_null() == *expected,
        }
    }
}

fn equals(value: &Value, expected: &Value) -> bool {
    if expected.is_null() {
        return value.is_null();
    }
    value.compare(expected) == Some(Ordering::Equal)
}

fn text_matches(value: &Value, pred: impl Fn(&str) -> bool) -> bool {
    value.as_text().is_some_and(|text| pred(&text))
}

/// A composable query filter.
///
/// `Q` objects can be combined using `&` (AND), `|` (OR), and `!` (NOT)
/// operators to build arbitrarily complex conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum Q {
    /// A single field lookup.
    Filter {
        /// The field name (may use `__` notation for nested fields).
        field: String,
        /// The lookup operation.
        lookup: Lookup,
    },
    /// Logical AND of multiple conditions.
    And(Vec<Q>),
    /// Logical OR of multiple conditions.
    Or(Vec<Q>),
    /// Logical negation of a condition.
    Not(Box<Q>),
}

impl Q {
    /// Creates a new filter Q object.
    pub fn filter(field: impl Into<String>, lookup: Lookup) -> Self {
        Self::Filter {
            field: field.into(),
            lookup,
        }
    }

    /// Returns `true` if this is an empty AND or OR.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(children) | Self::Or(children) => children.is_empty(),
            _ => false,
        }
    }

    /// Evaluates this filter against a JSON row.
    ///
    /// Missing fields read as NULL. An empty AND matches everything and an
    /// empty OR matches nothing, mirroring `1=1` and `1=0` in SQL.
    pub fn matches(&self, row: &serde_json::Value) -> bool {
        match self {
            Self::Filter { field, lookup } => lookup.matches(&field_value(row, field)),
            Self::And(children) => children.iter().all(|q| q.matches(row)),
            Self::Or(children) => children.iter().any(|q| q.matches(row)),
            Self::Not(inner) => !inner.matches(row),
        }
    }
}

/// Resolves a possibly nested (`author__name`) field of a JSON row.
pub fn field_value(row: &serde_json::Value, field: &str) -> Value {
    let mut current = row;
    for part in field.split("__") {
        match current.get(part) {
            Some(next) => current = next,
            None => return Value::Null,
        }
    }
    Value::from(current)
}

impl ops::BitAnd for Q {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            // Flatten nested ANDs
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (other, Self::And(mut right)) => {
                right.insert(0, other);
                Self::And(right)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }
}

impl ops::BitOr for Q {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            // Flatten nested ORs
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (other, Self::Or(mut right)) => {
                right.insert(0, other);
                Self::Or(right)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }
}

impl ops::Not for Q {
    type Output = Self;

    fn not(self) -> Self::Output {
        // Double negation cancellation
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}
