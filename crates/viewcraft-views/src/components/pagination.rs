//! Page-number pagination.
//!
//! Runs after every other component so it counts and slices the fully
//! filtered, ordered queryset.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use viewcraft_core::{Settings, ViewcraftError, ViewcraftResult};
use viewcraft_db::QuerySet;
use viewcraft_http::{modify_query_params, HttpRequest};

use crate::component::{Component, Context};

/// Page size and page link settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    per_page: usize,
    page_param: String,
    max_pages: Option<usize>,
    visible_pages: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: 10,
            page_param: "page".to_string(),
            max_pages: None,
            visible_pages: 5,
        }
    }
}

fn at_least_one(name: &str, value: usize) -> ViewcraftResult<usize> {
    if value == 0 {
        return Err(ViewcraftError::Configuration(format!(
            "{name} must be at least 1"
        )));
    }
    Ok(value)
}

impl PaginationConfig {
    /// `per_page` objects per page, other settings at their defaults.
    pub fn new(per_page: usize) -> ViewcraftResult<Self> {
        Ok(Self {
            per_page: at_least_one("per_page", per_page)?,
            ..Self::default()
        })
    }

    /// Seeds page size, parameter name and link window from settings.
    pub fn from_settings(settings: &Settings) -> ViewcraftResult<Self> {
        Ok(Self::new(settings.default_per_page)?
            .with_page_param(settings.page_param.clone())
            .with_visible_pages(settings.visible_pages)?)
    }

    #[must_use]
    pub fn with_page_param(mut self, page_param: impl Into<String>) -> Self {
        self.page_param = page_param.into();
        self
    }

    /// Caps the number of pages served, whatever the object count.
    pub fn with_max_pages(mut self, max_pages: usize) -> ViewcraftResult<Self> {
        self.max_pages = Some(at_least_one("max_pages", max_pages)?);
        Ok(self)
    }

    /// Sets how many numbered page links surround the current page.
    pub fn with_visible_pages(mut self, visible_pages: usize) -> ViewcraftResult<Self> {
        self.visible_pages = at_least_one("visible_pages", visible_pages)?;
        Ok(self)
    }

    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn page_param(&self) -> &str {
        &self.page_param
    }

    pub const fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }

    pub const fn visible_pages(&self) -> usize {
        self.visible_pages
    }

    /// Pages needed for `count` objects: at least one, at most `max_pages`.
    pub fn total_pages(&self, count: usize) -> usize {
        let pages = count.div_ceil(self.per_page).max(1);
        self.max_pages.map_or(pages, |max| pages.min(max))
    }

    /// The window of page numbers shown around `current`.
    ///
    /// ```
    /// use viewcraft_views::PaginationConfig;
    ///
    /// let config = PaginationConfig::default();
    /// assert_eq!(config.page_range(1, 20), vec![1, 2, 3, 4, 5]);
    /// assert_eq!(config.page_range(10, 20), vec![8, 9, 10, 11, 12]);
    /// assert_eq!(config.page_range(20, 20), vec![16, 17, 18, 19, 20]);
    /// assert_eq!(config.page_range(2, 3), vec![1, 2, 3]);
    /// ```
    pub fn page_range(&self, current: usize, total: usize) -> Vec<usize> {
        let visible = self.visible_pages;
        let total = total.max(1);
        let current = current.clamp(1, total);
        let mut start = current.saturating_sub(visible / 2).max(1);
        let end = start.saturating_add(visible - 1).min(total);
        if end - start < visible - 1 {
            start = end.saturating_sub(visible - 1).max(1);
        }
        (start..=end).collect()
    }
}

/// Slices the queryset to the requested page and describes the page.
#[derive(Debug)]
pub struct PaginationComponent {
    config: Arc<PaginationConfig>,
    page: Option<usize>,
    total_count: Option<usize>,
}

impl PaginationComponent {
    pub const fn new(config: Arc<PaginationConfig>) -> Self {
        Self {
            config,
            page: None,
            total_count: None,
        }
    }

    /// The requested page number. A missing parameter means page 1;
    /// anything that is not a positive integer is an invalid page.
    pub fn page_number(&mut self, request: &HttpRequest) -> ViewcraftResult<usize> {
        if let Some(page) = self.page {
            return Ok(page);
        }
        let page = match request.get().get(self.config.page_param()) {
            None => 1,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(page) if page >= 1 => usize::try_from(page)
                    .map_err(|_| ViewcraftError::InvalidPage(format!("Page {page} does not exist")))?,
                Ok(_) => {
                    return Err(ViewcraftError::InvalidPage(
                        "Page numbers must be positive".into(),
                    ))
                }
                Err(_) => {
                    return Err(ViewcraftError::InvalidPage(format!(
                        "Invalid page number: {raw}"
                    )))
                }
            },
        };
        self.page = Some(page);
        Ok(page)
    }

    fn page_url(&self, request: &HttpRequest, page: usize) -> String {
        modify_query_params(
            request,
            &[(self.config.page_param(), Some(&page.to_string()))],
        )
    }

    fn page_urls(&self, request: &HttpRequest, current: usize, total: usize) -> serde_json::Value {
        let url_if = |condition: bool, page: usize| condition.then(|| self.page_url(request, page));
        let pages: BTreeMap<String, String> = self
            .config
            .page_range(current, total)
            .into_iter()
            .map(|page| (page.to_string(), self.page_url(request, page)))
            .collect();
        json!({
            "first": url_if(current > 1, 1),
            "last": url_if(current < total, total),
            "previous": url_if(current > 1, current.saturating_sub(1)),
            "next": url_if(current < total, current + 1),
            "pages": pages,
        })
    }
}

impl Component for PaginationComponent {
    fn name(&self) -> &str {
        "pagination"
    }

    fn sequence(&self) -> i32 {
        100
    }

    fn process_get_queryset(
        &mut self,
        request: &HttpRequest,
        queryset: QuerySet,
    ) -> ViewcraftResult<QuerySet> {
        let page = self.page_number(request)?;
        let count = queryset.count();
        self.total_count = Some(count);

        let total = self.config.total_pages(count);
        if page > total {
            return Err(ViewcraftError::InvalidPage(format!("Page {page} does not exist")));
        }

        let per_page = self.config.per_page();
        let start = (page - 1) * per_page;
        tracing::debug!(page, total_pages = total, count, "paginating");
        Ok(queryset.slice(start, start + per_page))
    }

    fn process_get_context_data(
        &mut self,
        request: &HttpRequest,
        mut context: Context,
    ) -> ViewcraftResult<Context> {
        let page = self.page_number(request)?;
        let count = self.total_count.unwrap_or(0);
        let total = self.config.total_pages(count);
        let per_page = self.config.per_page();

        let start_index = if count == 0 { 0 } else { (page - 1) * per_page + 1 };
        let end_index = (page * per_page).min(count);

        context.insert(
            "page_obj".into(),
            json!({
                "number": page,
                "has_previous": page > 1,
                "has_next": page < total,
                "previous_page_number": (page > 1).then(|| page - 1),
                "next_page_number": (page < total).then(|| page + 1),
                "start_index": start_index,
                "end_index": end_index,
                "total_pages": total,
                "total_count": count,
                "per_page": per_page,
                "page_range": self.config.page_range(page, total),
                "page_urls": self.page_urls(request, page, total),
            }),
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> QuerySet {
        QuerySet::from_rows("items", (1..=n).map(|i| json!({"id": i})).collect())
    }

    fn request(qs: &str) -> HttpRequest {
        HttpRequest::builder().path("/items/").query_string(qs).build()
    }

    fn component(per_page: usize) -> PaginationComponent {
        PaginationComponent::new(Arc::new(PaginationConfig::new(per_page).unwrap()))
    }

    #[test]
    fn test_config_validation() {
        assert!(PaginationConfig::new(0).is_err());
        assert!(PaginationConfig::default().with_max_pages(0).is_err());
        assert!(PaginationConfig::default().with_visible_pages(0).is_err());
        let err = PaginationConfig::new(0).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_total_pages() {
        let config = PaginationConfig::new(10).unwrap();
        assert_eq!(config.total_pages(0), 1);
        assert_eq!(config.total_pages(10), 1);
        assert_eq!(config.total_pages(11), 2);
        assert_eq!(config.with_max_pages(3).unwrap().total_pages(100), 3);
    }

    #[test]
    fn test_page_range_small_window() {
        let config = PaginationConfig::default().with_visible_pages(1).unwrap();
        assert_eq!(config.page_range(4, 9), vec![4]);
        let config = PaginationConfig::default().with_visible_pages(4).unwrap();
        assert_eq!(config.page_range(1, 2), vec![1, 2]);
        assert_eq!(config.page_range(5, 10), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_page_range_huge_window_shows_every_page() {
        let config = PaginationConfig::default()
            .with_visible_pages(usize::MAX)
            .unwrap();
        assert_eq!(config.page_range(1, 3), vec![1, 2, 3]);
        assert_eq!(config.page_range(3, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_slices_requested_page() {
        let mut c = component(10);
        let qs = c.process_get_queryset(&request("page=3"), rows(25)).unwrap();
        let ids: Vec<i64> = qs.fetch().iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, [21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_invalid_pages() {
        for qs in ["page=0", "page=-1", "page=abc", "page=", "page=4"] {
            let err = component(10)
                .process_get_queryset(&request(qs), rows(25))
                .unwrap_err();
            assert!(matches!(err, ViewcraftError::InvalidPage(_)), "{qs}");
            assert_eq!(err.status_code(), 404);
        }
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let mut c = component(10);
        c.process_get_queryset(&request(""), rows(0)).unwrap();
        let ctx = c.process_get_context_data(&request(""), Context::new()).unwrap();
        let page = &ctx["page_obj"];
        assert_eq!(page["total_pages"], 1);
        assert_eq!(page["start_index"], 0);
        assert_eq!(page["end_index"], 0);
        assert_eq!(page["page_urls"]["next"], serde_json::Value::Null);
    }

    #[test]
    fn test_max_pages_caps_access() {
        let config = PaginationConfig::new(10).unwrap().with_max_pages(2).unwrap();
        let mut c = PaginationComponent::new(Arc::new(config));
        assert!(c.process_get_queryset(&request("page=3"), rows(50)).is_err());
    }

    #[test]
    fn test_context() {
        let mut c = component(10);
        let req = request("q=abc&page=2");
        c.process_get_queryset(&req, rows(45)).unwrap();
        let ctx = c.process_get_context_data(&req, Context::new()).unwrap();
        let page = &ctx["page_obj"];

        assert_eq!(page["number"], 2);
        assert_eq!(page["has_previous"], true);
        assert_eq!(page["next_page_number"], 3);
        assert_eq!(page["start_index"], 11);
        assert_eq!(page["end_index"], 20);
        assert_eq!(page["total_pages"], 5);
        assert_eq!(page["total_count"], 45);
        assert_eq!(page["page_range"], json!([1, 2, 3, 4, 5]));

        let urls = &page["page_urls"];
        assert_eq!(urls["first"], "/items/?q=abc&page=1");
        assert_eq!(urls["previous"], "/items/?q=abc&page=1");
        assert_eq!(urls["next"], "/items/?q=abc&page=3");
        assert_eq!(urls["last"], "/items/?q=abc&page=5");
        assert_eq!(urls["pages"]["4"], "/items/?q=abc&page=4");
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            page_param: "p".into(),
            default_per_page: 25,
            visible_pages: 7,
            ..Settings::default()
        };
        let config = PaginationConfig::from_settings(&settings).unwrap();
        assert_eq!(config.page_param(), "p");
        assert_eq!(config.per_page(), 25);
        assert_eq!(config.visible_pages(), 7);
        assert!(PaginationConfig::from_settings(&Settings {
            default_per_page: 0,
            ..Settings::default()
        })
        .is_err());
    }
}
