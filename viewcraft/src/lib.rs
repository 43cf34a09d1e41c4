//! # viewcraft
//!
//! Composable search, filtering, ordering and pagination for list views.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `viewcraft` for everything, or on individual crates for finer-grained
//! control.

/// Errors, settings and logging.
pub use viewcraft_core as core;

/// Model metadata, `Q` predicates and the in-memory `QuerySet`.
#[cfg(feature = "db")]
pub use viewcraft_db as db;

/// Requests, responses and query-string helpers.
#[cfg(feature = "http")]
pub use viewcraft_http as http;

/// Form fields and widgets backing the search form.
#[cfg(feature = "forms")]
pub use viewcraft_forms as forms;

/// Components, `ComponentView` and the Axum server.
#[cfg(feature = "views")]
pub use viewcraft_views as views;

/// The types most list views need.
pub mod prelude {
    pub use viewcraft_core::{Settings, ViewcraftError, ViewcraftResult};

    #[cfg(feature = "db")]
    pub use viewcraft_db::{FieldDef, FieldType, ModelMeta, OrderBy, QuerySet, Q};

    #[cfg(feature = "http")]
    pub use viewcraft_http::{HttpRequest, HttpResponse, JsonResponse};

    #[cfg(feature = "views")]
    pub use viewcraft_views::{
        Component, ComponentConfig, ComponentFactory, ComponentView, FieldKind, FilterConfig,
        ListSource, MatchType, ModelListSource, OrderingConfig, PaginationConfig, SearchConfig,
        SearchFieldSpec, SearchState, View, ViewcraftApp,
    };
}

// Third-party re-exports
pub use async_trait;
pub use axum;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;
