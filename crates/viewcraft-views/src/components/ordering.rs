//! User-selectable ordering from a comma-separated parameter.

use std::sync::Arc;

use serde_json::json;
use viewcraft_core::utils::text::humanize;
use viewcraft_core::{Settings, ViewcraftResult};
use viewcraft_db::{OrderBy, QuerySet};
use viewcraft_http::{modify_query_params, HttpRequest};

use crate::component::{Component, Context};

/// Orderable fields and the fallback ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingConfig {
    param_name: String,
    fields: Vec<String>,
    default: Vec<OrderBy>,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            param_name: "ordering".to_string(),
            fields: Vec::new(),
            default: Vec::new(),
        }
    }
}

impl OrderingConfig {
    /// Allows ordering by `fields`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Like [`new`](Self::new), with the parameter name from settings.
    pub fn from_settings<I, S>(settings: &Settings, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(fields).with_param_name(settings.ordering_param.clone())
    }

    #[must_use]
    pub fn with_param_name(mut self, param_name: impl Into<String>) -> Self {
        self.param_name = param_name.into();
        self
    }

    /// Sets the ordering used when the parameter is absent or names no
    /// orderable field.
    #[must_use]
    pub fn with_default(mut self, default: Vec<OrderBy>) -> Self {
        self.default = default;
        self
    }

    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    /// Parses an ordering parameter. Unknown and repeated fields are
    /// dropped; if nothing survives the default applies.
    ///
    /// ```
    /// use viewcraft_db::OrderBy;
    /// use viewcraft_views::OrderingConfig;
    ///
    /// let config = OrderingConfig::new(["title", "created"])
    ///     .with_default(vec![OrderBy::desc("created")]);
    /// assert_eq!(
    ///     config.parse("-title,secret,title"),
    ///     vec![OrderBy::desc("title")]
    /// );
    /// assert_eq!(config.parse("secret"), vec![OrderBy::desc("created")]);
    /// ```
    pub fn parse(&self, raw: &str) -> Vec<OrderBy> {
        let mut ordering: Vec<OrderBy> = Vec::new();
        for order in raw.split(',').filter_map(OrderBy::parse) {
            if !self.fields.contains(&order.column) {
                tracing::trace!(field = %order.column, "ignoring unknown ordering field");
                continue;
            }
            if ordering.iter().all(|o| o.column != order.column) {
                ordering.push(order);
            }
        }
        if ordering.is_empty() {
            self.default.clone()
        } else {
            ordering
        }
    }
}

/// Orders the list by the request's ordering parameter.
#[derive(Debug)]
pub struct OrderingComponent {
    config: Arc<OrderingConfig>,
    ordering: Option<Vec<OrderBy>>,
}

impl OrderingComponent {
    pub const fn new(config: Arc<OrderingConfig>) -> Self {
        Self {
            config,
            ordering: None,
        }
    }

    /// The request's ordering, parsed on first use.
    pub fn ordering(&mut self, request: &HttpRequest) -> &[OrderBy] {
        let config = &self.config;
        self.ordering.get_or_insert_with(|| {
            config.parse(request.get().get(config.param_name()).unwrap_or_default())
        })
    }
}

impl Component for OrderingComponent {
    fn name(&self) -> &str {
        "ordering"
    }

    fn process_get_queryset(
        &mut self,
        request: &HttpRequest,
        queryset: QuerySet,
    ) -> ViewcraftResult<QuerySet> {
        let ordering = self.ordering(request).to_vec();
        if ordering.is_empty() {
            return Ok(queryset);
        }
        Ok(queryset.order_by(ordering))
    }

    fn process_get_context_data(
        &mut self,
        request: &HttpRequest,
        mut context: Context,
    ) -> ViewcraftResult<Context> {
        let config = Arc::clone(&self.config);
        let current = self.ordering(request).to_vec();

        let fields: Vec<serde_json::Value> = config
            .fields
            .iter()
            .map(|field| {
                let direction = current.iter().find(|o| &o.column == field).map(|o| {
                    if o.descending {
                        "desc"
                    } else {
                        "asc"
                    }
                });
                // Ascending flips to descending; anything else starts ascending.
                let toggle = if direction == Some("asc") {
                    OrderBy::desc(field.as_str())
                } else {
                    OrderBy::asc(field.as_str())
                };
                json!({
                    "field": field,
                    "label": humanize(field),
                    "direction": direction,
                    "url": modify_query_params(
                        request,
                        &[(config.param_name(), Some(&toggle.to_param()))],
                    ),
                })
            })
            .collect();

        context.insert(
            "ordering".into(),
            json!({
                "current": current.iter().map(OrderBy::to_param).collect::<Vec<_>>(),
                "fields": fields,
            }),
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Arc<OrderingConfig> {
        Arc::new(
            OrderingConfig::new(["title", "views"]).with_default(vec![OrderBy::asc("title")]),
        )
    }

    fn request(qs: &str) -> HttpRequest {
        HttpRequest::builder().path("/posts/").query_string(qs).build()
    }

    #[test]
    fn test_orders_rows() {
        let rows = QuerySet::from_rows(
            "blog_post",
            vec![
                json!({"title": "b", "views": 1}),
                json!({"title": "a", "views": 3}),
                json!({"title": "c", "views": 2}),
            ],
        );
        let mut component = OrderingComponent::new(config());
        let qs = component
            .process_get_queryset(&request("ordering=-views"), rows)
            .unwrap();
        let titles: Vec<String> = qs
            .fetch()
            .iter()
            .filter_map(|r| r["title"].as_str().map(ToString::to_string))
            .collect();
        assert_eq!(titles, ["a", "c", "b"]);
    }

    #[test]
    fn test_default_when_absent() {
        let mut component = OrderingComponent::new(config());
        assert_eq!(component.ordering(&request("")), &[OrderBy::asc("title")]);
    }

    #[test]
    fn test_no_default_leaves_queryset() {
        let mut component = OrderingComponent::new(Arc::new(OrderingConfig::new(["title"])));
        let qs = component
            .process_get_queryset(&request("ordering=bogus"), QuerySet::from_rows("t", vec![]))
            .unwrap();
        assert!(qs.ordering().is_empty());
    }

    #[test]
    fn test_context_toggles() {
        let mut component = OrderingComponent::new(config());
        let ctx = component
            .process_get_context_data(&request("ordering=title&page=2"), Context::new())
            .unwrap();
        let ordering = &ctx["ordering"];
        assert_eq!(ordering["current"], json!(["title"]));
        assert_eq!(ordering["fields"][0]["direction"], "asc");
        assert_eq!(ordering["fields"][0]["url"], "/posts/?ordering=-title&page=2");
        assert_eq!(ordering["fields"][1]["direction"], serde_json::Value::Null);
        assert_eq!(ordering["fields"][1]["url"], "/posts/?ordering=views&page=2");
        assert_eq!(ordering["fields"][1]["label"], "Views");
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            ordering_param: "sort".into(),
            ..Settings::default()
        };
        assert_eq!(OrderingConfig::from_settings(&settings, ["title"]).param_name(), "sort");
    }
}
