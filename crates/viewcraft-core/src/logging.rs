//! Logging integration for viewcraft.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-request spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug",
/// "info,viewcraft_views=trace"). In debug mode a pretty, human-readable
/// format is used; otherwise a structured JSON format is used.
///
/// Installing a second subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for a list-view request.
///
/// Every log entry emitted while decoding search state and running the
/// component chain carries the request path.
///
/// # Examples
///
/// ```
/// use viewcraft_core::logging::request_span;
///
/// let span = request_span("/posts/");
/// let _guard = span.enter();
/// tracing::info!("handling request");
/// ```
pub fn request_span(path: &str) -> tracing::Span {
    tracing::info_span!("request", path = path)
}
