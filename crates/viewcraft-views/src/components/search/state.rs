//! The decoded search: criteria keyed by field plus an optional global term.

use super::match_type::MatchType;

/// The value side of a criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriterionValue {
    Scalar(String),
    /// Inclusive bounds; an empty bound leaves that side open.
    Range { min: String, max: String },
    List(Vec<String>),
}

impl CriterionValue {
    /// A range over the given bounds, trimmed.
    pub fn range(min: impl AsRef<str>, max: impl AsRef<str>) -> Self {
        Self::Range {
            min: min.as_ref().trim().to_string(),
            max: max.as_ref().trim().to_string(),
        }
    }

    /// Returns `true` when there is nothing to search for.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(value) => value.is_empty(),
            Self::Range { min, max } => min.is_empty() && max.is_empty(),
            Self::List(values) => values.is_empty(),
        }
    }

    /// The wire form: a string, a `[min, max]` pair, or an array.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Scalar(value) => serde_json::Value::String(value.clone()),
            Self::Range { min, max } => serde_json::json!([min, max]),
            Self::List(values) => serde_json::json!(values),
        }
    }

    /// A short human rendering for search chips.
    pub fn display(&self) -> String {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Range { min, max } if max.is_empty() => format!("from {min}"),
            Self::Range { min, max } if min.is_empty() => format!("up to {max}"),
            Self::Range { min, max } => format!("{min} to {max}"),
            Self::List(values) => values.join(", "),
        }
    }

    /// Trims the value and reshapes it to what `match_type` carries: a
    /// range for `range`, a list for `in`, a scalar for everything else.
    fn normalized(self, match_type: MatchType) -> Self {
        match (match_type, self) {
            (MatchType::Range, Self::Range { min, max }) => Self::range(min, max),
            (MatchType::Range, Self::Scalar(min)) => Self::range(min, ""),
            (MatchType::Range, Self::List(values)) => Self::range(
                values.first().map_or("", String::as_str),
                values.get(1).map_or("", String::as_str),
            ),
            (MatchType::In, Self::Scalar(value)) => Self::List(split_list(&value)),
            (MatchType::In, Self::Range { min, max }) => Self::List(trimmed([min, max])),
            (MatchType::In, Self::List(values)) => Self::List(trimmed(values)),
            (_, Self::Scalar(value)) => Self::Scalar(value.trim().to_string()),
            (_, Self::Range { min, max }) => Self::Scalar(trimmed([min, max]).join(",")),
            (_, Self::List(values)) => Self::Scalar(trimmed(values).join(",")),
        }
    }
}

fn trimmed(values: impl IntoIterator<Item = String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Splits a comma-separated list, dropping blank items.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// One field/match type/value search condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub field: String,
    pub match_type: MatchType,
    pub value: CriterionValue,
}

impl Criterion {
    /// Builds a criterion. Values are trimmed and reshaped to fit the match
    /// type: a scalar given for `range` becomes its lower bound, a scalar
    /// given for `in` is split on commas, and a range or list given for a
    /// scalar match type is joined with commas.
    pub fn new(field: impl Into<String>, match_type: MatchType, value: CriterionValue) -> Self {
        Self {
            field: field.into(),
            match_type,
            value: value.normalized(match_type),
        }
    }

    /// Shorthand for a scalar criterion.
    pub fn scalar(field: impl Into<String>, match_type: MatchType, value: impl Into<String>) -> Self {
        Self::new(field, match_type, CriterionValue::Scalar(value.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// A search: at most one criterion per field, kept in insertion order,
/// plus an optional free-text term matched across several fields.
///
/// Empty criteria and blank global terms are never stored, so an empty
/// state always encodes to no token.
///
/// ```
/// use viewcraft_views::{Criterion, MatchType, SearchState};
///
/// let mut state = SearchState::new();
/// state.insert(Criterion::scalar("title", MatchType::Contains, "rust"));
/// state.insert(Criterion::scalar("status", MatchType::Equals, "   "));
/// assert_eq!(state.len(), 1);
/// assert!(state.get("status").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    criteria: Vec<Criterion>,
    global: Option<String>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a criterion, replacing any existing one for the same field in
    /// place. An empty criterion removes the field instead.
    ///
    /// The value is reshaped as in [`Criterion::new`], so a criterion built
    /// field by field still encodes to a token that decodes back to it.
    pub fn insert(&mut self, criterion: Criterion) {
        let Criterion {
            field,
            match_type,
            value,
        } = criterion;
        let criterion = Criterion::new(field, match_type, value);
        if criterion.is_empty() {
            self.remove(&criterion.field);
            return;
        }
        match self.criteria.iter_mut().find(|c| c.field == criterion.field) {
            Some(existing) => *existing = criterion,
            None => self.criteria.push(criterion),
        }
    }

    /// Removes and returns the criterion for `field`.
    pub fn remove(&mut self, field: &str) -> Option<Criterion> {
        let index = self.criteria.iter().position(|c| c.field == field)?;
        Some(self.criteria.remove(index))
    }

    pub fn get(&self, field: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.field == field)
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn global(&self) -> Option<&str> {
        self.global.as_deref()
    }

    /// Sets the global term. A blank term clears it.
    pub fn set_global(&mut self, term: impl AsRef<str>) {
        let term = term.as_ref().trim();
        self.global = (!term.is_empty()).then(|| term.to_string());
    }

    /// A copy of this state without the criterion for `field`.
    #[must_use]
    pub fn without(&self, field: &str) -> Self {
        let mut state = self.clone();
        state.remove(field);
        state
    }

    /// A copy of this state without the global term.
    #[must_use]
    pub fn without_global(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
            global: None,
        }
    }

    /// Number of per-field criteria.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty() && self.global.is_none()
    }
}
