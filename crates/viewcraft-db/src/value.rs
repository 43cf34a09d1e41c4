//! Backend-agnostic values for lookups and rows.
//!
//! The [`Value`] enum is what lookups carry, what the SQL compiler emits as
//! parameters, and what in-memory rows are converted into before they are
//! compared. Comparison is deliberately forgiving about representation:
//! a JSON row stores dates as strings, so `"2024-03-01"` compares against a
//! [`Value::Date`] by parsing the string first.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Format accepted when a string must be read as a date.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime formats accepted when a string must be read as a datetime,
/// tried in order before falling back to RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A backend-agnostic representation of a field value.
///
/// # Examples
///
/// ```
/// use viewcraft_db::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v, Value::Int(42));
///
/// let v = Value::from("hello");
/// assert_eq!(v, Value::String("hello".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// SQL NULL.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A date without time.
    Date(NaiveDate),
    /// A date and time without timezone.
    DateTime(NaiveDateTime),
    /// A list of values (for IN clauses).
    List(Vec<Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::List(vals) => {
                write!(f, "[")?;
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

impl From<&serde_json::Value> for Value {
    /// Converts a JSON row value. Objects have no counterpart and are kept
    /// as their JSON text.
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
            serde_json::Value::Object(_) => Self::String(json.to_string()),
        }
    }
}

impl Value {
    /// Returns `true` if this value is `Null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Attempts to extract a boolean value.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract a float value. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the text a substring lookup matches against, or `None` for NULL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Converts this value to JSON for rendering in a context.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::json!(i),
            Self::Float(f) => serde_json::json!(f),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
            Self::DateTime(dt) => {
                serde_json::Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    /// Parses an ISO `YYYY-MM-DD` date. A datetime string yields its date part.
    ///
    /// ```
    /// use viewcraft_db::value::Value;
    ///
    /// assert!(Value::parse_date("2024-03-01").is_some());
    /// assert!(Value::parse_date("yesterday").is_none());
    /// ```
    pub fn parse_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .ok()
            .or_else(|| Self::parse_datetime_only(s).map(|dt| dt.date()))
    }

    /// Parses an ISO datetime. A bare date is read as midnight.
    pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        Self::parse_datetime_only(s).or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    }

    fn parse_datetime_only(s: &str) -> Option<NaiveDateTime> {
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
    }

    /// Reads a string as a value of the same kind as `like`, or `None` if
    /// the string does not parse as that kind.
    fn parse_like(s: &str, like: &Self) -> Option<Self> {
        let s = s.trim();
        match like {
            Self::Bool(_) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(Self::Bool(true)),
                "false" | "0" | "no" | "off" => Some(Self::Bool(false)),
                _ => None,
            },
            Self::Int(_) => s
                .parse::<i64>()
                .map(Self::Int)
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(Self::Float)),
            Self::Float(_) => s.parse::<f64>().ok().map(Self::Float),
            Self::Date(_) => Self::parse_date(s).map(Self::Date),
            Self::DateTime(_) => Self::parse_datetime(s).map(Self::DateTime),
            Self::String(_) => Some(Self::String(s.to_string())),
            Self::Null | Self::List(_) => None,
        }
    }

    /// Compares two values, coercing across representations where that is
    /// unambiguous (mixed numerics, date vs datetime, strings vs typed values).
    ///
    /// Returns `None` when the values are not comparable.
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use viewcraft_db::value::Value;
    ///
    /// assert_eq!(Value::Int(5).compare(&Value::Float(5.0)), Some(Ordering::Equal));
    /// assert_eq!(Value::from("10").compare(&Value::Int(9)), Some(Ordering::Greater));
    /// assert_eq!(Value::from("abc").compare(&Value::Int(9)), None);
    /// ```
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Null, _) | (_, Self::Null) => None,
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::Date(b)) => Some(a.date().cmp(b)),
            (Self::Date(a), Self::DateTime(b)) => Some(a.cmp(&b.date())),
            (Self::String(s), typed) if !matches!(typed, Self::List(_)) => {
                Self::parse_like(s, typed)?.compare(typed)
            }
            (typed, Self::String(s)) if !matches!(typed, Self::List(_)) => {
                typed.compare(&Self::parse_like(s, typed)?)
            }
            _ => None,
        }
    }
}
