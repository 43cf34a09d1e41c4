//! List sources, the component-driven list view, and the async [`View`]
//! trait it is served through.

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::json;
use viewcraft_core::{ViewcraftError, ViewcraftResult};
use viewcraft_db::{ModelMeta, QuerySet};
use viewcraft_forms::widgets::escape_html;
use viewcraft_http::{HttpRequest, HttpResponse, JsonResponse};

use crate::component::{hook_error, Component, Context, HookMethod};
use crate::components::search::codec::encode;
use crate::components::search::{EncodedToken, SearchForm};
use crate::config::ComponentConfig;

/// Supplies the base queryset and base context of a list view.
pub trait ListSource: Send + Sync {
    /// The unfiltered queryset components start from.
    fn get_queryset(&self, request: &HttpRequest) -> ViewcraftResult<QuerySet>;

    /// The base context for the final queryset. The default fetches the
    /// rows into `object_list`.
    fn get_context_data(
        &self,
        _request: &HttpRequest,
        queryset: &QuerySet,
    ) -> ViewcraftResult<Context> {
        let mut context = Context::new();
        context.insert("object_list".into(), json!(queryset.fetch()));
        Ok(context)
    }

    /// The template named in HTML responses.
    fn template_name(&self) -> &str {
        "object_list.html"
    }
}

impl ListSource for QuerySet {
    fn get_queryset(&self, _request: &HttpRequest) -> ViewcraftResult<QuerySet> {
        Ok(self.clone())
    }
}

/// Lists the rows of one model, in the model's default ordering.
#[derive(Debug, Clone)]
pub struct ModelListSource {
    meta: ModelMeta,
    rows: Arc<Vec<serde_json::Value>>,
    template_name: String,
}

impl ModelListSource {
    /// The template defaults to `<app_label>/<model_name>_list.html`.
    pub fn new(meta: ModelMeta, rows: Vec<serde_json::Value>) -> Self {
        Self {
            template_name: format!("{}/{}_list.html", meta.app_label, meta.model_name),
            meta,
            rows: Arc::new(rows),
        }
    }

    #[must_use]
    pub fn with_template_name(mut self, template_name: impl Into<String>) -> Self {
        self.template_name = template_name.into();
        self
    }

    pub const fn meta(&self) -> &ModelMeta {
        &self.meta
    }
}

impl ListSource for ModelListSource {
    fn get_queryset(&self, _request: &HttpRequest) -> ViewcraftResult<QuerySet> {
        let queryset = QuerySet::from_shared(self.meta.db_table.clone(), Arc::clone(&self.rows));
        if self.meta.ordering.is_empty() {
            Ok(queryset)
        } else {
            Ok(queryset.order_by(self.meta.ordering.clone()))
        }
    }

    fn get_context_data(
        &self,
        _request: &HttpRequest,
        queryset: &QuerySet,
    ) -> ViewcraftResult<Context> {
        let mut context = Context::new();
        context.insert("object_list".into(), json!(queryset.fetch()));
        context.insert("model".into(), json!(self.meta.label()));
        context.insert("verbose_name".into(), json!(self.meta.verbose_name));
        Ok(context)
    }

    fn template_name(&self) -> &str {
        &self.template_name
    }
}

/// The base trait for views, dispatching on the HTTP method.
///
/// Every handler defaults to 405 Method Not Allowed, except `head`, which
/// runs `get`, and `options`, which lists the allowed methods.
#[async_trait]
pub trait View: Send + Sync {
    /// Returns the list of HTTP methods this view allows.
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![http::Method::GET, http::Method::HEAD, http::Method::OPTIONS]
    }

    /// Dispatches the request to the handler for its method.
    async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        match *request.method() {
            http::Method::GET => self.get(request).await,
            http::Method::POST => self.post(request).await,
            http::Method::HEAD => self.head(request).await,
            http::Method::OPTIONS => self.options(request).await,
            _ => self.http_method_not_allowed(request).await,
        }
    }

    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.http_method_not_allowed(request).await
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.http_method_not_allowed(request).await
    }

    async fn head(&self, request: HttpRequest) -> HttpResponse {
        self.get(request).await
    }

    /// Returns an empty response with an `Allow` header.
    async fn options(&self, _request: HttpRequest) -> HttpResponse {
        let methods = self.allowed_methods();
        let method_strs: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
        let mut response = HttpResponse::ok("");
        if let Ok(value) = http::header::HeaderValue::from_str(&method_strs.join(", ")) {
            response.headers_mut().insert(http::header::ALLOW, value);
        }
        response
    }

    async fn http_method_not_allowed(&self, _request: HttpRequest) -> HttpResponse {
        let methods = self.allowed_methods();
        let method_strs: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
        HttpResponse::not_allowed(&method_strs)
    }
}

/// A list view assembled from components.
///
/// The configs are fixed when the view is built and shared by every
/// request. Each request gets fresh components, ordered by sequence (ties
/// keep declaration order), which then run around the source's
/// `get_queryset` and `get_context_data`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use viewcraft_db::QuerySet;
/// use viewcraft_http::HttpRequest;
/// use viewcraft_views::{ComponentView, PaginationConfig};
///
/// let rows = (1..=25).map(|id| json!({"id": id})).collect();
/// let view = ComponentView::new(QuerySet::from_rows("items", rows))
///     .with_component(PaginationConfig::new(10).unwrap());
///
/// let request = HttpRequest::builder().query_string("page=3").build();
/// let context = view.render(&request).unwrap();
/// assert_eq!(context["object_list"].as_array().unwrap().len(), 5);
/// ```
pub struct ComponentView<S> {
    source: S,
    components: Vec<ComponentConfig>,
}

impl<S: ListSource> ComponentView<S> {
    pub const fn new(source: S) -> Self {
        Self {
            source,
            components: Vec::new(),
        }
    }

    /// Adds a component.
    #[must_use]
    pub fn with_component(mut self, config: impl Into<ComponentConfig>) -> Self {
        self.components.push(config.into());
        self
    }

    pub fn components(&self) -> &[ComponentConfig] {
        &self.components
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Builds this request's components in hook order.
    pub fn build_components(&self, request: &HttpRequest) -> ViewcraftResult<Vec<Box<dyn Component>>> {
        let mut components = self
            .components
            .iter()
            .map(|config| config.build(request))
            .collect::<ViewcraftResult<Vec<_>>>()?;
        components.sort_by_key(|component| component.sequence());
        Ok(components)
    }

    /// Runs the `get_queryset` hook chain.
    pub fn get_queryset(
        &self,
        request: &HttpRequest,
        components: &mut [Box<dyn Component>],
    ) -> ViewcraftResult<QuerySet> {
        const METHOD: HookMethod = HookMethod::GetQueryset;

        for component in components.iter_mut() {
            let early = component
                .pre_get_queryset(request)
                .map_err(|err| hook_error(component.name(), "pre", METHOD, err))?;
            if let Some(queryset) = early {
                tracing::debug!(component = component.name(), "pre hook short-circuited get_queryset");
                return Ok(queryset);
            }
        }

        let mut queryset = self.source.get_queryset(request)?;
        for component in components.iter_mut() {
            queryset = component
                .process_get_queryset(request, queryset)
                .map_err(|err| hook_error(component.name(), "process", METHOD, err))?;
        }

        for component in components.iter_mut() {
            component
                .post_get_queryset(request)
                .map_err(|err| hook_error(component.name(), "post", METHOD, err))?;
        }
        Ok(queryset)
    }

    /// Runs the `get_context_data` hook chain over the final queryset.
    pub fn get_context_data(
        &self,
        request: &HttpRequest,
        components: &mut [Box<dyn Component>],
        queryset: &QuerySet,
    ) -> ViewcraftResult<Context> {
        const METHOD: HookMethod = HookMethod::GetContextData;

        for component in components.iter_mut() {
            let early = component
                .pre_get_context_data(request)
                .map_err(|err| hook_error(component.name(), "pre", METHOD, err))?;
            if let Some(context) = early {
                tracing::debug!(
                    component = component.name(),
                    "pre hook short-circuited get_context_data"
                );
                return Ok(context);
            }
        }

        let mut context = self.source.get_context_data(request, queryset)?;
        for component in components.iter_mut() {
            context = component
                .process_get_context_data(request, context)
                .map_err(|err| hook_error(component.name(), "process", METHOD, err))?;
        }

        for component in components.iter_mut() {
            component
                .post_get_context_data(request)
                .map_err(|err| hook_error(component.name(), "post", METHOD, err))?;
        }
        Ok(context)
    }

    /// Runs both chains and returns the context.
    pub fn render(&self, request: &HttpRequest) -> ViewcraftResult<Context> {
        let mut components = self.build_components(request)?;
        let queryset = self.get_queryset(request, &mut components)?;
        self.get_context_data(request, &mut components, &queryset)
    }

    /// Where the non-JS search form redirects: the current URL carrying the
    /// submitted search, back on the first page.
    fn search_redirect(&self, request: &HttpRequest) -> Option<ViewcraftResult<String>> {
        let search = self.components.iter().find_map(ComponentConfig::as_search)?;
        let state = SearchForm::new(search).to_state(request.post());

        let token = match encode(&state) {
            Ok(token) => token,
            Err(err) => return Some(Err(err)),
        };
        let mut updates = vec![(search.param_name(), token.as_ref().map(EncodedToken::as_str))];
        for config in &self.components {
            if let ComponentConfig::Pagination(pagination) = config {
                updates.push((pagination.page_param(), None));
            }
        }
        Some(Ok(viewcraft_http::modify_query_params(request, &updates)))
    }

    fn render_response(&self, request: &HttpRequest, context: &Context) -> HttpResponse {
        if request.accepts_json() {
            return JsonResponse::new(context);
        }
        let template_name = self.source.template_name();
        let context_json = serde_json::to_string_pretty(context).unwrap_or_default();
        let body = format!(
            "<!-- Template: {template_name} -->\n<html><body><pre>{}</pre></body></html>",
            escape_html(&context_json)
        );
        HttpResponse::ok(body)
    }

    fn error_response(request: &HttpRequest, err: &ViewcraftError) -> HttpResponse {
        if err.status_code() >= 500 {
            tracing::error!(error = %err, path = request.path(), "list view failed");
        } else {
            tracing::warn!(error = %err, path = request.path(), "list view rejected request");
        }
        if request.accepts_json() {
            let status =
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return JsonResponse::with_status(status, &json!({ "error": err.to_string() }));
        }
        HttpResponse::from_error(err)
    }
}

#[async_trait]
impl<S: ListSource> View for ComponentView<S> {
    fn allowed_methods(&self) -> Vec<http::Method> {
        let mut methods = vec![http::Method::GET, http::Method::HEAD, http::Method::OPTIONS];
        if self.components.iter().any(|c| c.as_search().is_some()) {
            methods.insert(1, http::Method::POST);
        }
        methods
    }

    async fn get(&self, request: HttpRequest) -> HttpResponse {
        match self.render(&request) {
            Ok(context) => self.render_response(&request, &context),
            Err(err) => Self::error_response(&request, &err),
        }
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        match self.search_redirect(&request) {
            Some(Ok(url)) => HttpResponse::redirect(&url),
            Some(Err(err)) => Self::error_response(&request, &err),
            None => self.http_method_not_allowed(request).await,
        }
    }
}

impl<S> std::fmt::Debug for ComponentView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentView")
            .field("components", &self.components)
            .finish_non_exhaustive()
    }
}
