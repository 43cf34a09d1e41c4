//! Turning a search state into a query predicate.

use viewcraft_db::value::Value;
use viewcraft_db::{Lookup, Q};

use super::config::{SearchConfig, SearchFieldSpec};
use super::match_type::{parse_bool, FieldKind, MatchType};
use super::state::{Criterion, CriterionValue, SearchState};

/// Builds the predicate for `state`.
///
/// Per-field criteria are AND-ed in the config's declaration order, then
/// the global term is AND-ed as an OR across the global fields. A criterion
/// the field cannot answer is dropped rather than reported. An empty state
/// gives an empty AND, which a `QuerySet` ignores.
pub fn apply(state: &SearchState, config: &SearchConfig) -> Q {
    let mut parts = Vec::new();

    for spec in config.fields() {
        let Some(criterion) = state.get(spec.field_name()) else {
            continue;
        };
        match criterion_q(spec, criterion, config.is_case_sensitive(spec)) {
            Some(q) => parts.push(q),
            None => tracing::debug!(
                field = spec.field_name(),
                match_type = %criterion.match_type,
                "dropping search criterion the field cannot answer"
            ),
        }
    }

    if let Some(term) = state.global() {
        if term.chars().count() < config.min_length() {
            tracing::trace!(term, min_length = config.min_length(), "global term too short");
        } else if !config.global_fields().is_empty() {
            parts.push(Q::Or(
                config
                    .global_fields()
                    .iter()
                    .map(|field| Q::filter(field.as_str(), Lookup::IContains(term.to_string())))
                    .collect(),
            ));
        }
    }

    Q::And(parts)
}

fn criterion_q(spec: &SearchFieldSpec, criterion: &Criterion, case_sensitive: bool) -> Option<Q> {
    let kind = spec.kind();
    let match_type = criterion.match_type;
    if !spec.allows(match_type) || !kind.supports(match_type) {
        return None;
    }

    let field = spec.field_name();
    let lookup = match (match_type, &criterion.value) {
        (MatchType::Range, CriterionValue::Range { min, max }) => {
            let low = bound(kind, min)?;
            let high = bound(kind, max)?;
            match (low, high) {
                (Some(low), Some(high)) => Lookup::Range(low, high),
                (Some(low), None) => Lookup::Gte(low),
                (None, Some(high)) => Lookup::Lte(high),
                (None, None) => return None,
            }
        }
        (MatchType::In, CriterionValue::List(values)) if !values.is_empty() => Lookup::In(
            values
                .iter()
                .map(|v| kind.coerce(v))
                .collect::<Option<Vec<_>>>()?,
        ),
        (MatchType::IsNull, CriterionValue::Scalar(raw)) => Lookup::IsNull(parse_bool(raw)?),
        (_, CriterionValue::Scalar(raw)) => scalar_lookup(kind, match_type, raw, case_sensitive)?,
        _ => return None,
    };
    Some(Q::filter(field, lookup))
}

/// A range bound: `Some(None)` when open, `None` when it does not coerce.
fn bound(kind: FieldKind, raw: &str) -> Option<Option<Value>> {
    if raw.is_empty() {
        Some(None)
    } else {
        kind.coerce(raw).map(Some)
    }
}

fn scalar_lookup(
    kind: FieldKind,
    match_type: MatchType,
    raw: &str,
    case_sensitive: bool,
) -> Option<Lookup> {
    if match_type.is_text_match() {
        let text = raw.to_string();
        return Some(match (match_type, case_sensitive) {
            (MatchType::Contains, true) => Lookup::Contains(text),
            (MatchType::Contains, false) => Lookup::IContains(text),
            (MatchType::StartsWith, true) => Lookup::StartsWith(text),
            (MatchType::StartsWith, false) => Lookup::IStartsWith(text),
            (MatchType::EndsWith, true) => Lookup::EndsWith(text),
            _ => Lookup::IEndsWith(text),
        });
    }

    let value = kind.coerce(raw)?;
    Some(match match_type {
        MatchType::Equals => Lookup::Exact(value),
        MatchType::IEquals => Lookup::IExact(value),
        MatchType::Gt => Lookup::Gt(value),
        MatchType::Gte => Lookup::Gte(value),
        MatchType::Lt => Lookup::Lt(value),
        MatchType::Lte => Lookup::Lte(value),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::search::SearchFieldSpec;
    use serde_json::json;
    use viewcraft_db::QuerySet;

    fn config() -> SearchConfig {
        SearchConfig::new(vec![
            SearchFieldSpec::for_kind("title", FieldKind::Text).unwrap(),
            SearchFieldSpec::new(
                "status",
                FieldKind::Text,
                vec![MatchType::Equals, MatchType::In],
            )
            .unwrap(),
            SearchFieldSpec::for_kind("price", FieldKind::Float).unwrap(),
            SearchFieldSpec::for_kind("views", FieldKind::Integer).unwrap(),
            SearchFieldSpec::for_kind("published_on", FieldKind::Date).unwrap(),
        ])
        .unwrap()
        .with_global_fields(&["title", "body"])
        .unwrap()
    }

    fn rows() -> QuerySet {
        QuerySet::from_rows(
            "blog_post",
            vec![
                json!({"id": 1, "title": "Rust Ownership", "body": "moves", "status": "published", "price": 5.0, "views": 10, "published_on": "2024-01-10"}),
                json!({"id": 2, "title": "Async Rust", "body": "futures", "status": "draft", "price": 10.0, "views": 250, "published_on": "2024-03-02"}),
                json!({"id": 3, "title": "Lifetimes", "body": "borrowing rust", "status": "published", "price": 20.0, "views": null, "published_on": "2024-06-20"}),
            ],
        )
    }

    fn ids(state: &SearchState) -> Vec<i64> {
        rows()
            .filter(apply(state, &config()))
            .fetch()
            .iter()
            .filter_map(|row| row["id"].as_i64())
            .collect()
    }

    fn state_with(criteria: Vec<Criterion>) -> SearchState {
        let mut state = SearchState::new();
        for c in criteria {
            state.insert(c);
        }
        state
    }

    #[test]
    fn test_empty_state_is_empty_and() {
        assert!(apply(&SearchState::new(), &config()).is_empty());
        assert_eq!(ids(&SearchState::new()), [1, 2, 3]);
    }

    #[test]
    fn test_contains_is_case_insensitive_by_default() {
        let state = state_with(vec![Criterion::scalar("title", MatchType::Contains, "rust")]);
        assert_eq!(ids(&state), [1, 2]);
    }

    #[test]
    fn test_case_sensitive_field() {
        let config = SearchConfig::new(vec![SearchFieldSpec::for_kind("title", FieldKind::Text)
            .unwrap()
            .with_case_sensitive(true)])
        .unwrap();
        let state = state_with(vec![Criterion::scalar("title", MatchType::Contains, "rust")]);
        assert_eq!(
            apply(&state, &config),
            Q::And(vec![Q::filter("title", Lookup::Contains("rust".into()))])
        );
    }

    #[test]
    fn test_range_is_inclusive() {
        let state = state_with(vec![Criterion::new(
            "price",
            MatchType::Range,
            CriterionValue::range("5", "10"),
        )]);
        assert_eq!(ids(&state), [1, 2]);
    }

    #[test]
    fn test_one_sided_range() {
        let state = state_with(vec![Criterion::new(
            "price",
            MatchType::Range,
            CriterionValue::range("10", ""),
        )]);
        assert_eq!(
            apply(&state, &config()),
            Q::And(vec![Q::filter("price", Lookup::Gte(Value::Float(10.0)))])
        );
        assert_eq!(ids(&state), [2, 3]);
    }

    #[test]
    fn test_open_lower_bound() {
        let state = state_with(vec![Criterion::new(
            "price",
            MatchType::Range,
            CriterionValue::range("", "10"),
        )]);
        assert_eq!(
            apply(&state, &config()),
            Q::And(vec![Q::filter("price", Lookup::Lte(Value::Float(10.0)))])
        );
        assert_eq!(ids(&state), [1, 2]);
    }

    #[test]
    fn test_status_equals() {
        let state = state_with(vec![Criterion::scalar("status", MatchType::Equals, "published")]);
        assert_eq!(ids(&state), [1, 3]);
    }

    #[test]
    fn test_in_and_isnull() {
        let state = state_with(vec![Criterion::scalar("views", MatchType::In, "10, 250")]);
        assert_eq!(ids(&state), [1, 2]);
        let state = state_with(vec![Criterion::scalar("views", MatchType::IsNull, "yes")]);
        assert_eq!(ids(&state), [3]);
    }

    #[test]
    fn test_dates_compare() {
        let state = state_with(vec![Criterion::scalar(
            "published_on",
            MatchType::Gte,
            "2024-03-01",
        )]);
        assert_eq!(ids(&state), [2, 3]);
    }

    #[test]
    fn test_dropped_criteria() {
        let state = state_with(vec![
            Criterion::scalar("status", MatchType::Contains, "pub"),
            Criterion::scalar("published_on", MatchType::Contains, "2024"),
            Criterion::scalar("views", MatchType::Gt, "abc"),
            Criterion::new("price", MatchType::Range, CriterionValue::range("cheap", "20")),
        ]);
        assert!(apply(&state, &config()).is_empty());
    }

    #[test]
    fn test_declaration_order() {
        let state = state_with(vec![
            Criterion::scalar("views", MatchType::Gt, "1"),
            Criterion::scalar("title", MatchType::Contains, "rust"),
        ]);
        let Q::And(parts) = apply(&state, &config()) else {
            panic!("expected AND");
        };
        let fields: Vec<&str> = parts
            .iter()
            .filter_map(|q| match q {
                Q::Filter { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fields, ["title", "views"]);
    }

    #[test]
    fn test_global_term() {
        let mut state = SearchState::new();
        state.set_global("borrow");
        assert_eq!(ids(&state), [3]);

        state.set_global("r");
        assert!(apply(&state, &config()).is_empty());
    }

    #[test]
    fn test_global_and_field_are_anded() {
        let mut state = state_with(vec![Criterion::scalar("status", MatchType::Equals, "published")]);
        state.set_global("rust");
        assert_eq!(ids(&state), [1, 3]);
        state.insert(Criterion::scalar("price", MatchType::Lt, "10"));
        assert_eq!(ids(&state), [1]);
    }
}
