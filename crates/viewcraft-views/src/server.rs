//! Serving views over HTTP.
//!
//! [`ViewcraftApp`] maps paths to [`View`]s and converts into an Axum
//! router, or runs one directly on a Tokio listener.
//!
//! # Examples
//!
//! ```no_run
//! use serde_json::json;
//! use viewcraft_core::Settings;
//! use viewcraft_db::QuerySet;
//! use viewcraft_views::{ComponentView, PaginationConfig, ViewcraftApp};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rows = vec![json!({"title": "Hello"})];
//! let view = ComponentView::new(QuerySet::from_rows("posts", rows))
//!     .with_component(PaginationConfig::new(20)?);
//!
//! let app = ViewcraftApp::new(Settings::default()).route("/posts/", view);
//! // app.run("0.0.0.0:8000").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::response::IntoResponse;
use axum::routing::any;
use tracing::Instrument;

use viewcraft_core::logging::request_span;
use viewcraft_core::{Settings, ViewcraftError, ViewcraftResult};
use viewcraft_http::{HttpRequest, HttpResponse};

use crate::view::View;

/// Request bodies larger than this are rejected with 400.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A set of routed views plus the settings they were configured from.
pub struct ViewcraftApp {
    settings: Settings,
    routes: Vec<(String, Arc<dyn View>)>,
}

impl ViewcraftApp {
    pub const fn new(settings: Settings) -> Self {
        Self {
            settings,
            routes: Vec::new(),
        }
    }

    /// Serves `view` at exactly `path`. A later route for the same path
    /// replaces the earlier one.
    #[must_use]
    pub fn route(mut self, path: impl Into<String>, view: impl View + 'static) -> Self {
        let path = path.into();
        self.routes.retain(|(p, _)| *p != path);
        self.routes.push((path, Arc::new(view)));
        self
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Converts the application into an Axum router. Unrouted paths get a
    /// plain 404.
    pub fn into_axum_router(self) -> axum::Router {
        let mut router = axum::Router::new();
        for (path, view) in self.routes {
            let handler = move |req: Request<Body>| {
                let view = Arc::clone(&view);
                async move { serve(view.as_ref(), req).await.into_response() }
            };
            router = router.route(&path, any(handler));
        }
        router.fallback(|req: Request<Body>| async move {
            tracing::debug!(path = req.uri().path(), "no view routed");
            HttpResponse::not_found("Not Found").into_response()
        })
    }

    /// Runs the application on `addr` until the server stops.
    pub async fn run(self, addr: &str) -> ViewcraftResult<()> {
        let routes = self.route_count();
        let router = self.into_axum_router();
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            ViewcraftError::Configuration(format!("Failed to bind to {addr}: {e}"))
        })?;

        tracing::info!(routes, "serving list views at http://{addr}/");

        axum::serve(listener, router).await?;
        Ok(())
    }
}

async fn serve(view: &dyn View, req: Request<Body>) -> HttpResponse {
    let (parts, body) = req.into_parts();
    let span = request_span(parts.uri.path());

    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes.to_vec(),
        Err(err) => {
            tracing::warn!(parent: &span, error = %err, "failed to read request body");
            return HttpResponse::bad_request("Request body could not be read");
        }
    };

    let request = HttpRequest::from_axum(parts, body);
    view.dispatch(request).instrument(span).await
}

impl std::fmt::Debug for ViewcraftApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths: Vec<&str> = self.routes.iter().map(|(p, _)| p.as_str()).collect();
        f.debug_struct("ViewcraftApp")
            .field("routes", &paths)
            .field("debug", &self.settings.debug)
            .finish()
    }
}
