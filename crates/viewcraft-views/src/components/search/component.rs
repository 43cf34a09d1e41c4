//! The search component.

use std::sync::Arc;

use serde_json::json;
use viewcraft_core::ViewcraftResult;
use viewcraft_db::QuerySet;
use viewcraft_http::{modify_query_params, HttpRequest};

use super::apply::apply;
use super::codec::{decode, encode, to_wire, EncodedToken, GLOBAL_KEY};
use super::config::SearchConfig;
use super::form::SearchForm;
use super::state::SearchState;
use crate::component::{Component, Context};

/// Returns the current URL with `state` encoded into the search parameter,
/// or with the parameter removed when `state` is empty. Other parameters
/// are kept.
pub fn search_url_for(
    request: &HttpRequest,
    config: &SearchConfig,
    state: &SearchState,
) -> ViewcraftResult<String> {
    let token = encode(state)?;
    Ok(modify_query_params(
        request,
        &[(config.param_name(), token.as_ref().map(EncodedToken::as_str))],
    ))
}

/// Filters the list by the search token in the request and describes the
/// search in the context. Runs before every other component.
#[derive(Debug)]
pub struct SearchComponent {
    config: Arc<SearchConfig>,
    state: Option<SearchState>,
}

impl SearchComponent {
    pub const fn new(config: Arc<SearchConfig>) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// The request's search, decoded on first use.
    pub fn state(&mut self, request: &HttpRequest) -> &SearchState {
        let config = &self.config;
        self.state.get_or_insert_with(|| {
            let state = request
                .get()
                .get(config.param_name())
                .map(|token| decode(token, config))
                .unwrap_or_default();
            tracing::debug!(
                criteria = state.len(),
                global = state.global().is_some(),
                "decoded search"
            );
            state
        })
    }

    fn active_search(
        request: &HttpRequest,
        config: &SearchConfig,
        state: &SearchState,
    ) -> ViewcraftResult<Vec<serde_json::Value>> {
        let mut chips = Vec::new();
        for criterion in state.criteria() {
            let label = config
                .field(&criterion.field)
                .map_or_else(|| criterion.field.clone(), |spec| spec.label().to_string());
            chips.push(json!({
                "field": criterion.field,
                "label": label,
                "match_type": criterion.match_type.as_str(),
                "match_type_label": criterion.match_type.label(),
                "value": criterion.value.display(),
                "remove_url": search_url_for(request, config, &state.without(&criterion.field))?,
            }));
        }
        if let Some(term) = state.global() {
            chips.push(json!({
                "field": GLOBAL_KEY,
                "label": "Search",
                "match_type": "contains",
                "match_type_label": "Contains",
                "value": term,
                "remove_url": search_url_for(request, config, &state.without_global())?,
            }));
        }
        Ok(chips)
    }
}

impl Component for SearchComponent {
    fn name(&self) -> &str {
        "search"
    }

    fn sequence(&self) -> i32 {
        -100
    }

    fn process_get_queryset(
        &mut self,
        request: &HttpRequest,
        queryset: QuerySet,
    ) -> ViewcraftResult<QuerySet> {
        let config = Arc::clone(&self.config);
        let predicate = apply(self.state(request), &config);
        if predicate.is_empty() {
            return Ok(queryset);
        }
        Ok(queryset.filter(predicate))
    }

    fn process_get_context_data(
        &mut self,
        request: &HttpRequest,
        mut context: Context,
    ) -> ViewcraftResult<Context> {
        let config = Arc::clone(&self.config);
        let state = self.state(request).clone();

        let mut form = SearchForm::new(&config);
        form.bind_state(&state);

        context.insert("search_form".into(), form.as_context());
        context.insert(
            "search_params".into(),
            serde_json::Value::Object(to_wire(&state)),
        );
        context.insert(
            "search_encoded".into(),
            json!(request.get().get(config.param_name()).unwrap_or_default()),
        );
        context.insert(
            "search_url".into(),
            json!(search_url_for(request, &config, &state)?),
        );
        context.insert(
            "active_search".into(),
            json!(Self::active_search(request, &config, &state)?),
        );
        context.insert(
            "search_clear_url".into(),
            json!(modify_query_params(request, &[(config.param_name(), None)])),
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use crate::components::search::{Criterion, CriterionValue, FieldKind, MatchType, SearchFieldSpec};

    fn config() -> Arc<SearchConfig> {
        Arc::new(
            SearchConfig::new(vec![
                SearchFieldSpec::for_kind("title", FieldKind::Text).unwrap(),
                SearchFieldSpec::for_kind("price", FieldKind::Float).unwrap(),
            ])
            .unwrap(),
        )
    }

    fn request_with(state: &SearchState, extra: &str) -> HttpRequest {
        let token = encode(state).unwrap().unwrap();
        HttpRequest::builder()
            .path("/posts/")
            .query_string(&format!("{extra}q={token}"))
            .build()
    }

    fn sample_state() -> SearchState {
        let mut state = SearchState::new();
        state.insert(Criterion::scalar("title", MatchType::Contains, "rust"));
        state.insert(Criterion::new("price", MatchType::Range, CriterionValue::range("10", "")));
        state
    }

    #[test]
    fn test_sequence_runs_first() {
        assert_eq!(SearchComponent::new(config()).sequence(), -100);
    }

    #[test]
    fn test_filters_queryset() {
        let request = request_with(&sample_state(), "");
        let rows = vec![
            json!({"title": "Rust in Action", "price": 12.0}),
            json!({"title": "Rust Basics", "price": 5.0}),
            json!({"title": "Go Patterns", "price": 30.0}),
        ];
        let mut component = SearchComponent::new(config());
        let qs = component
            .process_get_queryset(&request, QuerySet::from_rows("books", rows))
            .unwrap();
        assert_eq!(qs.count(), 1);
    }

    #[test]
    fn test_missing_token_leaves_queryset_alone() {
        let request = HttpRequest::builder().path("/posts/").build();
        let mut component = SearchComponent::new(config());
        let qs = component
            .process_get_queryset(&request, QuerySet::from_rows("books", vec![json!({})]))
            .unwrap();
        assert!(qs.where_clause().is_none());
    }

    #[test]
    fn test_context() {
        let request = request_with(&sample_state(), "page=2&");
        let mut component = SearchComponent::new(config());
        let ctx = component.process_get_context_data(&request, Context::new()).unwrap();

        assert_eq!(ctx["search_params"]["title"]["value"], "rust");
        assert_eq!(ctx["search_form"]["is_bound"], true);
        assert_eq!(ctx["search_clear_url"], "/posts/?page=2");
        let search_url = ctx["search_url"].as_str().unwrap();
        assert!(search_url.starts_with("/posts/?page=2&q="));

        let chips = ctx["active_search"].as_array().unwrap();
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0]["label"], "Title");
        assert_eq!(chips[1]["value"], "from 10");
        assert_eq!(chips[1]["match_type_label"], "Between");

        let remove_price = chips[1]["remove_url"].as_str().unwrap();
        let reduced = HttpRequest::builder()
            .path("/posts/")
            .query_string(remove_price.trim_start_matches("/posts/?"))
            .build();
        let mut component = SearchComponent::new(config());
        let state = component.state(&reduced);
        assert!(state.get("price").is_none());
        assert!(state.get("title").is_some());
    }

    #[test]
    fn test_removing_last_criterion_drops_param() {
        let mut state = SearchState::new();
        state.insert(Criterion::scalar("title", MatchType::Contains, "rust"));
        let request = request_with(&state, "");
        let mut component = SearchComponent::new(config());
        let ctx = component.process_get_context_data(&request, Context::new()).unwrap();
        assert_eq!(ctx["active_search"][0]["remove_url"], "/posts/");
    }

    #[test]
    fn test_unsupported_match_types_get_no_chip() {
        let raw = json!({
            "title": {"match_type": "range", "value": ["a", "z"]},
            "price": {"match_type": "contains", "value": "9"},
        });
        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(raw.to_string().as_bytes());
        let request = HttpRequest::builder()
            .path("/posts/")
            .query_string(&format!("q={token}"))
            .build();

        let mut component = SearchComponent::new(config());
        assert!(component.state(&request).is_empty());
        let ctx = component.process_get_context_data(&request, Context::new()).unwrap();
        assert_eq!(ctx["active_search"], json!([]));
        assert_eq!(ctx["search_params"], json!({}));
        assert_eq!(ctx["search_form"]["errors"], json!({}));
    }

    #[test]
    fn test_garbage_token_is_empty_search() {
        let request = HttpRequest::builder()
            .path("/posts/")
            .query_string("q=%%%not-a-token")
            .build();
        let mut component = SearchComponent::new(config());
        assert!(component.state(&request).is_empty());
        let ctx = component.process_get_context_data(&request, Context::new()).unwrap();
        assert_eq!(ctx["active_search"], json!([]));
        assert_eq!(ctx["search_url"], "/posts/");
    }
}
