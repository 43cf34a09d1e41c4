//! The search form, built from the configured fields.
//!
//! For each field `f` the form has a `f_match` radio group over the allowed
//! match types and a `f` text input; fields allowing a range also get
//! `f_min` and `f_max`. A `global` input is added when global fields are
//! configured.

use viewcraft_db::value::Value;
use viewcraft_forms::{BaseForm, Form, FormFieldDef, FormFieldType, WidgetType};
use viewcraft_http::QueryDict;

use super::config::{SearchConfig, SearchFieldSpec};
use super::match_type::MatchType;
use super::state::{Criterion, CriterionValue, SearchState};

/// Name of the global term input.
pub const GLOBAL_INPUT: &str = "global";

/// A search form for one [`SearchConfig`].
#[derive(Debug, Clone)]
pub struct SearchForm<'a> {
    config: &'a SearchConfig,
    form: BaseForm,
}

impl<'a> SearchForm<'a> {
    /// Builds the unbound form. Each match group starts on its field's
    /// default match type.
    pub fn new(config: &'a SearchConfig) -> Self {
        let mut fields = Vec::new();
        for spec in config.fields() {
            let name = spec.field_name();
            let choices = spec
                .match_types()
                .iter()
                .map(|mt| (mt.as_str().to_string(), mt.label().to_string()))
                .collect();
            fields.push(
                FormFieldDef::new(format!("{name}_match"), FormFieldType::Choice { choices })
                    .required(false)
                    .initial(spec.default_match_type().as_str())
                    .widget(WidgetType::RadioSelect)
                    .label(format!("{} match type", spec.label())),
            );
            fields.push(
                FormFieldDef::new(name, FormFieldType::text())
                    .required(false)
                    .label(spec.label()),
            );
            if spec.allows(MatchType::Range) {
                fields.push(
                    FormFieldDef::new(format!("{name}_min"), FormFieldType::text())
                        .required(false)
                        .label(format!("{} min", spec.label())),
                );
                fields.push(
                    FormFieldDef::new(format!("{name}_max"), FormFieldType::text())
                        .required(false)
                        .label(format!("{} max", spec.label())),
                );
            }
        }
        if !config.global_fields().is_empty() {
            fields.push(
                FormFieldDef::new(GLOBAL_INPUT, FormFieldType::text())
                    .required(false)
                    .label("Search"),
            );
        }
        Self {
            config,
            form: BaseForm::new(fields),
        }
    }

    /// Binds the form to an existing search so it redisplays it. An empty
    /// search leaves the form unbound.
    pub fn bind_state(&mut self, state: &SearchState) {
        if state.is_empty() {
            return;
        }
        self.form.bind(&state_to_form_data(state));
        self.form.is_valid();
    }

    /// Reads a search from submitted form data.
    ///
    /// A missing or invalid `f_match` choice falls back to the field's
    /// default. Range fields read `f_min`/`f_max` when the chosen match
    /// type is `range`, otherwise `f`.
    pub fn to_state(&self, data: &QueryDict) -> SearchState {
        let mut state = SearchState::new();
        for spec in self.config.fields() {
            let name = spec.field_name();
            let match_type = chosen_match_type(spec, data.get(&format!("{name}_match")));
            let value = if match_type == MatchType::Range {
                CriterionValue::range(
                    data.get(&format!("{name}_min")).unwrap_or_default(),
                    data.get(&format!("{name}_max")).unwrap_or_default(),
                )
            } else {
                CriterionValue::Scalar(data.get(name).unwrap_or_default().to_string())
            };
            state.insert(Criterion::new(name, match_type, value));
        }
        if let Some(term) = data.get(GLOBAL_INPUT) {
            state.set_global(term);
        }
        state
    }

    /// Returns `true` if the form carries an existing search.
    pub fn is_bound(&self) -> bool {
        self.form.is_bound()
    }

    /// The rendering context of the underlying form.
    pub fn as_context(&self) -> serde_json::Value {
        self.form.as_context()
    }

    /// Cleaned values, after [`bind_state`](Self::bind_state).
    pub fn cleaned_value(&self, name: &str) -> Option<&Value> {
        self.form.cleaned_data().get(name)
    }
}

fn chosen_match_type(spec: &SearchFieldSpec, submitted: Option<&str>) -> MatchType {
    submitted
        .and_then(MatchType::parse)
        .filter(|mt| spec.allows(*mt))
        .unwrap_or_else(|| spec.default_match_type())
}

fn state_to_form_data(state: &SearchState) -> QueryDict {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for criterion in state.criteria() {
        let name = &criterion.field;
        pairs.push((format!("{name}_match"), criterion.match_type.as_str().to_string()));
        match &criterion.value {
            CriterionValue::Scalar(value) => pairs.push((name.clone(), value.clone())),
            CriterionValue::Range { min, max } => {
                pairs.push((format!("{name}_min"), min.clone()));
                pairs.push((format!("{name}_max"), max.clone()));
            }
            CriterionValue::List(values) => pairs.push((name.clone(), values.join(","))),
        }
    }
    if let Some(term) = state.global() {
        pairs.push((GLOBAL_INPUT.to_string(), term.to_string()));
    }
    QueryDict::from_pairs(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::search::{FieldKind, SearchFieldSpec};

    fn config() -> SearchConfig {
        SearchConfig::new(vec![
            SearchFieldSpec::for_kind("title", FieldKind::Text).unwrap(),
            SearchFieldSpec::for_kind("price", FieldKind::Float).unwrap(),
        ])
        .unwrap()
        .with_global_fields(&["title"])
        .unwrap()
    }

    #[test]
    fn test_form_fields() {
        let config = config();
        let form = SearchForm::new(&config);
        let ctx = form.as_context();
        let names: Vec<&str> = ctx["fields"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["name"].as_str())
            .collect();
        assert_eq!(
            names,
            ["title_match", "title", "price_match", "price", "price_min", "price_max", "global"]
        );
        assert!(!form.is_bound());
        assert_eq!(ctx["fields"][0]["value"], "contains");
    }

    #[test]
    fn test_to_state() {
        let config = config();
        let data = QueryDict::parse(
            "title=+ownership+&title_match=startswith&price_match=range&price_min=10&price_max=&global=rust",
        );
        let state = SearchForm::new(&config).to_state(&data);
        assert_eq!(
            state.get("title"),
            Some(&Criterion::scalar("title", MatchType::StartsWith, "ownership"))
        );
        assert_eq!(state.get("price").unwrap().value, CriterionValue::range("10", ""));
        assert_eq!(state.global(), Some("rust"));
    }

    #[test]
    fn test_invalid_match_falls_back_to_default() {
        let config = config();
        let data = QueryDict::parse("title=rust&title_match=regex&price=5&price_match=contains");
        let state = SearchForm::new(&config).to_state(&data);
        assert_eq!(state.get("title").unwrap().match_type, MatchType::Contains);
        assert_eq!(state.get("price").unwrap().match_type, MatchType::Equals);
    }

    #[test]
    fn test_blank_submission_is_empty() {
        let config = config();
        let data = QueryDict::parse("title=&title_match=contains&global=+");
        assert!(SearchForm::new(&config).to_state(&data).is_empty());
    }

    #[test]
    fn test_bind_state_round_trips_through_form() {
        let config = config();
        let mut state = SearchState::new();
        state.insert(Criterion::new("price", MatchType::Range, CriterionValue::range("5", "9")));
        state.set_global("async");

        let mut form = SearchForm::new(&config);
        form.bind_state(&state);
        assert!(form.is_bound());
        assert_eq!(form.cleaned_value("price_min"), Some(&Value::from("5")));

        let ctx = form.as_context();
        assert_eq!(ctx["fields"][2]["value"], "range");
        let rebuilt = form.to_state(&state_to_form_data(&state));
        assert_eq!(rebuilt, state);
    }
}
