//! The post list view: searchable, filterable, orderable and paginated.

use viewcraft_core::{Settings, ViewcraftResult};
use viewcraft_db::query::OrderBy;
use viewcraft_views::{
    ComponentView, FieldKind, FilterConfig, MatchType, ModelListSource, OrderingConfig,
    PaginationConfig, SearchConfig, SearchFieldSpec,
};

use crate::models::{post_meta, sample_posts};

/// Builds the `/posts/` view over `count` generated posts.
pub fn post_list_view(
    settings: &Settings,
    count: usize,
) -> ViewcraftResult<ComponentView<ModelListSource>> {
    let fields = vec![
        SearchFieldSpec::for_kind("title", FieldKind::Text)?,
        SearchFieldSpec::for_kind("author", FieldKind::Text)?
            .with_default_match_type(MatchType::Equals)?,
        SearchFieldSpec::for_kind("views", FieldKind::Integer)?.with_label("View count"),
        SearchFieldSpec::for_kind("published", FieldKind::Boolean)?,
        SearchFieldSpec::for_kind("created", FieldKind::Date)?,
    ];
    let search = SearchConfig::from_settings(settings, fields)?.with_global_fields(&["title"])?;

    let filter = FilterConfig::from_settings(settings)
        .field("category", ["rust", "web", "databases"])
        .field("author", ["alice", "bob", "carol"]);

    let ordering = OrderingConfig::from_settings(settings, ["title", "views", "created"])
        .with_default(vec![OrderBy::desc("created")]);

    let pagination = PaginationConfig::from_settings(settings)?;

    Ok(ComponentView::new(ModelListSource::new(post_meta(), sample_posts(count)))
        .with_component(search)
        .with_component(filter)
        .with_component(ordering)
        .with_component(pagination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewcraft_http::HttpRequest;
    use viewcraft_views::components::search::codec::encode;
    use viewcraft_views::{Criterion, CriterionValue, SearchState, View};

    fn view() -> ComponentView<ModelListSource> {
        post_list_view(&Settings::default(), 30).unwrap()
    }

    fn json_request(query: &str) -> HttpRequest {
        HttpRequest::builder()
            .path("/posts/")
            .query_string(query)
            .header("accept", "application/json")
            .build()
    }

    fn body(response: &viewcraft_http::HttpResponse) -> serde_json::Value {
        serde_json::from_slice(&response.content_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_first_page() {
        let response = view().dispatch(json_request("")).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        let context = body(&response);
        assert_eq!(context["object_list"].as_array().unwrap().len(), 10);
        assert_eq!(context["object_list"][0]["created"], "2024-01-30");
        assert_eq!(context["page_obj"]["total_pages"], 3);
        assert_eq!(context["model"], "blog.post");
    }

    #[tokio::test]
    async fn test_search_filter_and_order() {
        let mut state = SearchState::new();
        state.insert(Criterion::new(
            "views",
            MatchType::Range,
            CriterionValue::range("100", ""),
        ));
        let token = encode(&state).unwrap().unwrap();
        let query = format!("q={token}&filter=category:rust&ordering=views");

        let context = body(&view().dispatch(json_request(&query)).await);
        let rows = context["object_list"].as_array().unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row["category"] == "rust"));
        assert!(rows.iter().all(|row| row["views"].as_u64().unwrap() >= 100));
        let views: Vec<u64> = rows.iter().map(|row| row["views"].as_u64().unwrap()).collect();
        assert!(views.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_page_out_of_range() {
        let response = view().dispatch(json_request("page=9")).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }
}
