//! Match types and the field kinds that support them.

use std::fmt;
use std::str::FromStr;

use viewcraft_db::value::Value;
use viewcraft_db::FieldType;

/// How a criterion compares a field with its value.
///
/// Each variant has one canonical wire name (used when encoding) and may
/// accept aliases when decoding, so tokens written with the lookup-style
/// names (`exact`, `icontains`, `between`) still resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Equals,
    IEquals,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    Range,
    In,
    IsNull,
}

impl MatchType {
    /// Every match type, in display order.
    pub const ALL: [Self; 12] = [
        Self::Equals,
        Self::IEquals,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Range,
        Self::In,
        Self::IsNull,
    ];

    /// Returns the canonical wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::IEquals => "iequals",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Range => "range",
            Self::In => "in",
            Self::IsNull => "isnull",
        }
    }

    /// Returns the label shown in forms and search chips.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equals => "Equals",
            Self::IEquals => "Equals (any case)",
            Self::Contains => "Contains",
            Self::StartsWith => "Starts with",
            Self::EndsWith => "Ends with",
            Self::Gt => "Greater than",
            Self::Gte => "At least",
            Self::Lt => "Less than",
            Self::Lte => "At most",
            Self::Range => "Between",
            Self::In => "One of",
            Self::IsNull => "Is empty",
        }
    }

    /// Resolves a wire name or alias, ignoring ASCII case.
    ///
    /// ```
    /// use viewcraft_views::MatchType;
    ///
    /// assert_eq!(MatchType::parse("exact"), Some(MatchType::Equals));
    /// assert_eq!(MatchType::parse("ICONTAINS"), Some(MatchType::Contains));
    /// assert_eq!(MatchType::parse("between"), Some(MatchType::Range));
    /// assert_eq!(MatchType::parse("regex"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let found = match name.as_str() {
            "equals" | "exact" => Self::Equals,
            "iequals" | "iexact" => Self::IEquals,
            "contains" | "icontains" => Self::Contains,
            "startswith" | "istartswith" => Self::StartsWith,
            "endswith" | "iendswith" => Self::EndsWith,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "range" | "between" => Self::Range,
            "in" => Self::In,
            "isnull" => Self::IsNull,
            _ => return None,
        };
        Some(found)
    }

    /// Returns `true` for the substring-style matches whose case rule
    /// follows the field's case sensitivity.
    pub const fn is_text_match(self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown match type: {s}"))
    }
}

/// The kind of data a searchable field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Date,
    DateTime,
    Boolean,
}

const TEXT_MATCHES: &[MatchType] = &[
    MatchType::Equals,
    MatchType::IEquals,
    MatchType::Contains,
    MatchType::StartsWith,
    MatchType::EndsWith,
    MatchType::In,
    MatchType::IsNull,
];

const NUMERIC_MATCHES: &[MatchType] = &[
    MatchType::Equals,
    MatchType::Gt,
    MatchType::Gte,
    MatchType::Lt,
    MatchType::Lte,
    MatchType::Range,
    MatchType::In,
    MatchType::IsNull,
];

const DATE_MATCHES: &[MatchType] = &[
    MatchType::Equals,
    MatchType::Gt,
    MatchType::Gte,
    MatchType::Lt,
    MatchType::Lte,
    MatchType::Range,
    MatchType::IsNull,
];

const BOOLEAN_MATCHES: &[MatchType] = &[MatchType::Equals, MatchType::IsNull];

impl FieldKind {
    /// Returns the match types this kind of field can answer.
    pub const fn supported_match_types(self) -> &'static [MatchType] {
        match self {
            Self::Text => TEXT_MATCHES,
            Self::Integer | Self::Float => NUMERIC_MATCHES,
            Self::Date | Self::DateTime => DATE_MATCHES,
            Self::Boolean => BOOLEAN_MATCHES,
        }
    }

    /// Returns `true` if this kind supports `match_type`.
    pub fn supports(self, match_type: MatchType) -> bool {
        self.supported_match_types().contains(&match_type)
    }

    /// The match type used when a criterion does not name one.
    pub const fn default_match_type(self) -> MatchType {
        match self {
            Self::Text => MatchType::Contains,
            _ => MatchType::Equals,
        }
    }

    /// Maps a model field type to a search kind. Unsupported types
    /// (JSON, UUID, relations) have none.
    pub const fn from_field_type(field_type: &FieldType) -> Option<Self> {
        if field_type.is_text() {
            Some(Self::Text)
        } else if field_type.is_integer() {
            Some(Self::Integer)
        } else if field_type.is_float() {
            Some(Self::Float)
        } else {
            match field_type {
                FieldType::DateField => Some(Self::Date),
                FieldType::DateTimeField => Some(Self::DateTime),
                FieldType::BooleanField => Some(Self::Boolean),
                _ => None,
            }
        }
    }

    /// Reads a submitted string as a value of this kind, or `None` if it
    /// does not parse.
    ///
    /// ```
    /// use viewcraft_db::Value;
    /// use viewcraft_views::FieldKind;
    ///
    /// assert_eq!(FieldKind::Integer.coerce(" 42 "), Some(Value::Int(42)));
    /// assert_eq!(FieldKind::Integer.coerce("abc"), None);
    /// assert_eq!(FieldKind::Boolean.coerce("yes"), Some(Value::Bool(true)));
    /// ```
    pub fn coerce(self, raw: &str) -> Option<Value> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match self {
            Self::Text => Some(Value::String(raw.to_string())),
            Self::Integer => raw.parse::<i64>().ok().map(Value::Int),
            Self::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            Self::Date => Value::parse_date(raw).map(Value::Date),
            Self::DateTime => Value::parse_datetime(raw).map(Value::DateTime),
            Self::Boolean => parse_bool(raw).map(Value::Bool),
        }
    }
}

/// Reads the usual spellings of a boolean.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for mt in MatchType::ALL {
            assert_eq!(MatchType::parse(mt.as_str()), Some(mt));
            assert_eq!(mt.to_string().parse::<MatchType>(), Ok(mt));
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(MatchType::parse("iexact"), Some(MatchType::IEquals));
        assert_eq!(MatchType::parse("istartswith"), Some(MatchType::StartsWith));
        assert_eq!(MatchType::parse("iendswith"), Some(MatchType::EndsWith));
        assert_eq!(MatchType::parse(" Between "), Some(MatchType::Range));
        assert!("nope".parse::<MatchType>().is_err());
    }

    #[test]
    fn test_kind_support() {
        assert!(FieldKind::Text.supports(MatchType::Contains));
        assert!(!FieldKind::Text.supports(MatchType::Range));
        assert!(FieldKind::Float.supports(MatchType::Range));
        assert!(!FieldKind::Date.supports(MatchType::In));
        assert!(!FieldKind::Boolean.supports(MatchType::Gt));
        assert_eq!(FieldKind::Text.default_match_type(), MatchType::Contains);
        assert_eq!(FieldKind::Date.default_match_type(), MatchType::Equals);
    }

    #[test]
    fn test_from_field_type() {
        assert_eq!(FieldKind::from_field_type(&FieldType::SlugField), Some(FieldKind::Text));
        assert_eq!(FieldKind::from_field_type(&FieldType::AutoField), Some(FieldKind::Integer));
        assert_eq!(
            FieldKind::from_field_type(&FieldType::DecimalField {
                max_digits: 8,
                decimal_places: 2
            }),
            Some(FieldKind::Float)
        );
        assert_eq!(
            FieldKind::from_field_type(&FieldType::DateTimeField),
            Some(FieldKind::DateTime)
        );
        assert_eq!(FieldKind::from_field_type(&FieldType::JsonField), None);
        assert_eq!(
            FieldKind::from_field_type(&FieldType::ForeignKey { to: "blog.author".into() }),
            None
        );
    }

    #[test]
    fn test_coerce() {
        assert_eq!(FieldKind::Float.coerce("9.99"), Some(Value::Float(9.99)));
        assert_eq!(FieldKind::Float.coerce("inf"), None);
        assert!(matches!(FieldKind::Date.coerce("2024-05-01"), Some(Value::Date(_))));
        assert_eq!(FieldKind::Date.coerce("May 1st"), None);
        assert!(matches!(
            FieldKind::DateTime.coerce("2024-05-01"),
            Some(Value::DateTime(_))
        ));
        assert_eq!(FieldKind::Text.coerce("  "), None);
        assert_eq!(FieldKind::Boolean.coerce("maybe"), None);
    }
}
