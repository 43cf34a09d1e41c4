//! Settings for viewcraft.
//!
//! [`Settings`] holds the process-wide defaults that component
//! configurations are seeded from: query parameter names, page sizes and
//! logging. A `Settings` value is built once at startup (see
//! [`settings_loader`](crate::settings_loader)) and passed explicitly to
//! whatever needs it; there is no global instance.

use serde::{Deserialize, Serialize};

/// The complete set of viewcraft settings.
///
/// # Examples
///
/// ```
/// use viewcraft_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.search_param, "q");
/// assert_eq!(settings.page_param, "page");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Selects pretty logs over JSON logs.
    pub debug: bool,
    /// The tracing filter directive (e.g. "info", "viewcraft_views=debug").
    pub log_level: String,

    // ── Query parameters ─────────────────────────────────────────────

    /// Query parameter carrying the encoded search token.
    pub search_param: String,
    /// Query parameter carrying `field:value` filters.
    pub filter_param: String,
    /// Query parameter carrying the ordering fields.
    pub ordering_param: String,
    /// Query parameter carrying the page number.
    pub page_param: String,

    // ── Search ───────────────────────────────────────────────────────

    /// Whether text match types are case sensitive unless a field overrides it.
    pub search_case_sensitive: bool,
    /// Minimum length of a global search term; shorter terms are ignored.
    pub search_min_length: usize,

    // ── Pagination ───────────────────────────────────────────────────

    /// Default number of objects per page.
    pub default_per_page: usize,
    /// Default number of page links shown around the current page.
    pub visible_pages: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            search_param: "q".to_string(),
            filter_param: "filter".to_string(),
            ordering_param: "ordering".to_string(),
            page_param: "page".to_string(),
            search_case_sensitive: false,
            search_min_length: 2,
            default_per_page: 10,
            visible_pages: 5,
        }
    }
}
