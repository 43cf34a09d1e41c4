//! The search token: a JSON object, Base64-encoded with the URL-safe
//! alphabet so it can travel in a single query parameter.
//!
//! ```text
//! {"price": {"match_type": "range", "value": ["10", ""]},
//!  "title": {"match_type": "contains", "value": "rust"},
//!  "global_search": "ownership"}
//! ```
//!
//! Decoding never fails. Anything that is not a well-formed token for the
//! configured fields reads as less search, down to the empty state.

use std::fmt;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde_json::{Map, Value as JsonValue};
use viewcraft_core::{ViewcraftError, ViewcraftResult};

use super::config::SearchConfig;
use super::match_type::MatchType;
use super::state::{split_list, Criterion, CriterionValue, SearchState};

/// The reserved key carrying the global term.
pub const GLOBAL_KEY: &str = "global_search";

/// Emits no padding, so a token needs no percent-encoding in a query
/// string. Accepts tokens with or without it.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// An encoded search, ready to be placed in a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedToken(String);

impl EncodedToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds the wire mapping for `state`.
pub fn to_wire(state: &SearchState) -> Map<String, JsonValue> {
    let mut wire = Map::new();
    for criterion in state.criteria() {
        if criterion.is_empty() {
            continue;
        }
        wire.insert(
            criterion.field.clone(),
            serde_json::json!({
                "match_type": criterion.match_type.as_str(),
                "value": criterion.value.to_json(),
            }),
        );
    }
    if let Some(term) = state.global() {
        wire.insert(GLOBAL_KEY.to_string(), JsonValue::String(term.to_string()));
    }
    wire
}

/// Encodes `state`, or returns `None` when there is nothing to encode.
pub fn encode(state: &SearchState) -> ViewcraftResult<Option<EncodedToken>> {
    let wire = to_wire(state);
    if wire.is_empty() {
        return Ok(None);
    }
    let json = serde_json::to_string(&wire)
        .map_err(|err| ViewcraftError::SearchEncoding(format!("Failed to encode search: {err}")))?;
    Ok(Some(EncodedToken(TOKEN_ENGINE.encode(json.as_bytes()))))
}

/// Decodes a token into its JSON object, or `None` if it is malformed.
///
/// Tolerates a token that is still percent-encoded, one whose `+` signs
/// became spaces during form decoding, and the standard alphabet.
pub fn decode_raw(token: &str) -> Option<Map<String, JsonValue>> {
    let unquoted = percent_encoding::percent_decode_str(token.trim()).decode_utf8_lossy();
    let normalized: String = unquoted
        .chars()
        .map(|c| match c {
            ' ' | '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = match TOKEN_ENGINE.decode(normalized.as_bytes()) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "search token is not valid base64");
            return None;
        }
    };
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(error = %err, "search token is not valid UTF-8");
            return None;
        }
    };
    match serde_json::from_str::<JsonValue>(&text) {
        Ok(JsonValue::Object(map)) => Some(map),
        Ok(_) => {
            tracing::debug!("search token root is not an object");
            None
        }
        Err(err) => {
            tracing::debug!(error = %err, "search token is not valid JSON");
            None
        }
    }
}

/// Decodes a token against `config`.
///
/// Unknown fields, unknown match types, match types the field does not
/// allow and entries of the wrong shape are dropped.
///
/// ```
/// use viewcraft_views::components::search::codec::{decode, encode};
/// use viewcraft_views::{Criterion, FieldKind, MatchType, SearchConfig, SearchFieldSpec, SearchState};
///
/// let config = SearchConfig::new(vec![
///     SearchFieldSpec::for_kind("title", FieldKind::Text).unwrap(),
/// ])
/// .unwrap();
///
/// let mut state = SearchState::new();
/// state.insert(Criterion::scalar("title", MatchType::Contains, "rust"));
/// let token = encode(&state).unwrap().unwrap();
/// assert_eq!(decode(token.as_str(), &config), state);
///
/// assert!(decode("not a token!", &config).is_empty());
/// ```
pub fn decode(token: &str, config: &SearchConfig) -> SearchState {
    let mut state = SearchState::new();
    let Some(wire) = decode_raw(token) else {
        return state;
    };

    // Declaration order, so the state reads the same whatever order the
    // token lists its keys in.
    for spec in config.fields() {
        let Some(entry) = wire.get(spec.field_name()) else {
            continue;
        };
        match parse_entry(entry, spec.default_match_type()) {
            Some((match_type, value))
                if spec.allows(match_type) && spec.kind().supports(match_type) =>
            {
                state.insert(Criterion::new(spec.field_name(), match_type, value));
            }
            Some((match_type, _)) => tracing::debug!(
                field = spec.field_name(),
                %match_type,
                "dropping search entry with a match type the field does not allow"
            ),
            None => tracing::debug!(field = spec.field_name(), "dropping malformed search entry"),
        }
    }

    for key in wire.keys() {
        if key != GLOBAL_KEY && config.field(key).is_none() {
            tracing::trace!(field = %key, "ignoring unknown search field");
        }
    }

    if let Some(term) = wire.get(GLOBAL_KEY).and_then(scalar_text) {
        state.set_global(term);
    }
    state
}

/// Reads one field entry: a bare scalar or a `{match_type, value}` object.
fn parse_entry(entry: &JsonValue, default: MatchType) -> Option<(MatchType, CriterionValue)> {
    let (match_type, value) = match entry {
        JsonValue::Object(obj) => {
            let match_type = match obj.get("match_type") {
                None | Some(JsonValue::Null) => default,
                Some(JsonValue::String(name)) => MatchType::parse(name)?,
                Some(_) => return None,
            };
            (match_type, obj.get("value")?)
        }
        scalar => (default, scalar),
    };

    let value = match (match_type, value) {
        (MatchType::Range, JsonValue::Array(items)) if items.len() == 2 => {
            let bound = |item: &JsonValue| match item {
                JsonValue::Null => Some(String::new()),
                other => scalar_text(other),
            };
            CriterionValue::range(bound(&items[0])?, bound(&items[1])?)
        }
        (MatchType::In, JsonValue::Array(items)) => {
            CriterionValue::List(items.iter().map(scalar_text).collect::<Option<Vec<_>>>()?)
        }
        (MatchType::In, scalar) => CriterionValue::List(split_list(&scalar_text(scalar)?)),
        (MatchType::Range, _) | (_, JsonValue::Array(_)) => return None,
        (_, scalar) => CriterionValue::Scalar(scalar_text(scalar)?),
    };
    Some((match_type, value))
}

/// Strings, numbers and booleans as text. Anything else is the wrong shape.
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::search::{FieldKind, SearchFieldSpec};

    fn config() -> SearchConfig {
        SearchConfig::new(vec![
            SearchFieldSpec::for_kind("title", FieldKind::Text).unwrap(),
            SearchFieldSpec::for_kind("status", FieldKind::Text)
                .unwrap()
                .with_default_match_type(MatchType::Equals)
                .unwrap(),
            SearchFieldSpec::for_kind("price", FieldKind::Float).unwrap(),
        ])
        .unwrap()
    }

    fn token(json: &JsonValue) -> String {
        TOKEN_ENGINE.encode(json.to_string().as_bytes())
    }

    #[test]
    fn test_empty_state_has_no_token() {
        assert_eq!(encode(&SearchState::new()).unwrap(), None);
    }

    #[test]
    fn test_round_trip() {
        let mut state = SearchState::new();
        state.insert(Criterion::scalar("title", MatchType::StartsWith, "Rust"));
        state.insert(Criterion::new("price", MatchType::Range, CriterionValue::range("10", "")));
        state.insert(Criterion::scalar("status", MatchType::In, "draft,published"));
        state.set_global("ownership");

        let token = encode(&state).unwrap().unwrap();
        let decoded = decode(token.as_str(), &config());
        assert_eq!(decoded.global(), Some("ownership"));
        for criterion in state.criteria() {
            assert_eq!(decoded.get(&criterion.field), Some(criterion));
        }
    }

    #[test]
    fn test_reshaped_values_round_trip() {
        let config = config();
        let states = [
            Criterion::scalar("price", MatchType::Range, "10"),
            Criterion::new("price", MatchType::Equals, CriterionValue::range("1", "2")),
            Criterion::new(
                "status",
                MatchType::Equals,
                CriterionValue::List(vec!["draft".into(), "published".into()]),
            ),
            Criterion::new("title", MatchType::In, CriterionValue::range("a", "b")),
            Criterion {
                field: "price".into(),
                match_type: MatchType::Range,
                value: CriterionValue::Scalar("7".into()),
            },
        ];
        for criterion in states {
            let mut state = SearchState::new();
            state.insert(criterion);
            let token = encode(&state).unwrap().unwrap();
            assert_eq!(decode(token.as_str(), &config), state);
        }
    }

    #[test]
    fn test_token_is_url_safe() {
        let mut state = SearchState::new();
        state.insert(Criterion::scalar("title", MatchType::Contains, "??>>??~~"));
        let token = encode(&state).unwrap().unwrap();
        assert!(!token.as_str().contains('+'));
        assert!(!token.as_str().contains('/'));
        assert!(!token.as_str().contains('='));
    }

    #[test]
    fn test_malformed_tokens_decode_empty() {
        let config = config();
        let bad_tokens = vec![
            String::new(),
            "%%%".to_string(),
            "not base64!".to_string(),
            TOKEN_ENGINE.encode(b"\xff\xfe"),
            TOKEN_ENGINE.encode(b"{not json"),
            token(&serde_json::json!([1, 2])),
        ];
        for bad in &bad_tokens {
            assert!(decode(bad, &config).is_empty(), "{bad}");
        }
    }

    #[test]
    fn test_tolerates_transport_damage() {
        let config = config();
        let raw = token(&serde_json::json!({"title": "rust"}));
        let padded = base64::engine::general_purpose::URL_SAFE
            .encode(serde_json::json!({"title": "rust"}).to_string().as_bytes());
        assert!(padded.ends_with('='));
        let percent = padded.replace('=', "%3D");
        for variant in [raw.as_str(), padded.as_str(), percent.as_str()] {
            assert_eq!(
                decode(variant, &config).get("title").map(|c| c.match_type),
                Some(MatchType::Contains)
            );
        }
    }

    #[test]
    fn test_unknown_fields_and_match_types_dropped() {
        let state = decode(
            &token(&serde_json::json!({
                "title": {"match_type": "regex", "value": "r.*"},
                "author": "ferris",
                "status": {"match_type": "exact", "value": "published"},
            })),
            &config(),
        );
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("status").unwrap().match_type, MatchType::Equals);
    }

    #[test]
    fn test_disallowed_match_types_dropped() {
        let state = decode(
            &token(&serde_json::json!({
                "title": {"match_type": "range", "value": ["a", "z"]},
                "status": {"match_type": "contains", "value": "pub"},
                "price": {"match_type": "gte", "value": 10},
            })),
            &SearchConfig::new(vec![
                SearchFieldSpec::for_kind("title", FieldKind::Text).unwrap(),
                SearchFieldSpec::new("status", FieldKind::Text, vec![MatchType::Equals]).unwrap(),
                SearchFieldSpec::for_kind("price", FieldKind::Float).unwrap(),
            ])
            .unwrap(),
        );
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("price").unwrap().match_type, MatchType::Gte);
    }

    #[test]
    fn test_scalar_entries_use_default_match_type() {
        let state = decode(&token(&serde_json::json!({"price": 9.5, "status": "draft"})), &config());
        assert_eq!(
            state.get("price").unwrap().value,
            CriterionValue::Scalar("9.5".into())
        );
        assert_eq!(state.get("price").unwrap().match_type, MatchType::Equals);
        assert_eq!(state.get("status").unwrap().match_type, MatchType::Equals);
    }

    #[test]
    fn test_wrong_shapes_dropped() {
        let state = decode(
            &token(&serde_json::json!({
                "price": {"match_type": "range", "value": "10"},
                "title": {"match_type": "contains", "value": ["a", "b"]},
                "status": {"match_type": "equals", "value": {"nested": true}},
            })),
            &config(),
        );
        assert!(state.is_empty());
    }

    #[test]
    fn test_range_with_null_bound() {
        let state = decode(
            &token(&serde_json::json!({"price": {"match_type": "between", "value": [null, 20]}})),
            &config(),
        );
        assert_eq!(state.get("price").unwrap().value, CriterionValue::range("", "20"));
    }

    #[test]
    fn test_wire_mapping() {
        let mut state = SearchState::new();
        state.insert(Criterion::new("price", MatchType::Range, CriterionValue::range("5", "10")));
        state.set_global("rust");
        let wire = to_wire(&state);
        assert_eq!(wire["price"], serde_json::json!({"match_type": "range", "value": ["5", "10"]}));
        assert_eq!(wire[GLOBAL_KEY], "rust");
    }
}
