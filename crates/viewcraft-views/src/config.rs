//! Component configuration.
//!
//! A [`ComponentConfig`] is declared once when the view is built and shared
//! by every request. Each request calls [`ComponentConfig::build`] to get a
//! fresh component holding that request's state.

use std::fmt;
use std::sync::Arc;

use viewcraft_core::{ViewcraftError, ViewcraftResult};
use viewcraft_http::HttpRequest;

use crate::component::{Component, ComponentFactory};
use crate::components::filter::{FilterComponent, FilterConfig};
use crate::components::ordering::{OrderingComponent, OrderingConfig};
use crate::components::pagination::{PaginationComponent, PaginationConfig};
use crate::components::search::{SearchComponent, SearchConfig};

/// The kinds of component a view can declare.
///
/// The built-in kinds cover search, filtering, ordering and pagination;
/// `Custom` takes any [`ComponentFactory`].
#[derive(Clone)]
pub enum ComponentConfig {
    Search(Arc<SearchConfig>),
    Filter(Arc<FilterConfig>),
    Ordering(Arc<OrderingConfig>),
    Pagination(Arc<PaginationConfig>),
    Custom(Arc<dyn ComponentFactory>),
}

impl ComponentConfig {
    /// Wraps a custom factory.
    pub fn custom(factory: impl ComponentFactory + 'static) -> Self {
        Self::Custom(Arc::new(factory))
    }

    /// Returns the name of the component this config builds.
    pub fn name(&self) -> &str {
        match self {
            Self::Search(_) => "search",
            Self::Filter(_) => "filter",
            Self::Ordering(_) => "ordering",
            Self::Pagination(_) => "pagination",
            Self::Custom(factory) => factory.name(),
        }
    }

    /// Returns the search configuration, if this is a search component.
    pub fn as_search(&self) -> Option<&Arc<SearchConfig>> {
        match self {
            Self::Search(config) => Some(config),
            _ => None,
        }
    }

    /// Builds the component for one request.
    ///
    /// Failures are reported as [`ViewcraftError::Component`].
    pub fn build(&self, request: &HttpRequest) -> ViewcraftResult<Box<dyn Component>> {
        let component: Box<dyn Component> = match self {
            Self::Search(config) => Box::new(SearchComponent::new(Arc::clone(config))),
            Self::Filter(config) => Box::new(FilterComponent::new(Arc::clone(config))),
            Self::Ordering(config) => Box::new(OrderingComponent::new(Arc::clone(config))),
            Self::Pagination(config) => Box::new(PaginationComponent::new(Arc::clone(config))),
            Self::Custom(factory) => factory.build(request).map_err(|err| match err {
                ViewcraftError::Component(_) => err,
                other => ViewcraftError::Component(format!(
                    "Failed to build component {}: {other}",
                    factory.name()
                )),
            })?,
        };
        tracing::debug!(
            component = component.name(),
            sequence = component.sequence(),
            "component initialised"
        );
        Ok(component)
    }
}

impl fmt::Debug for ComponentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search(config) => f.debug_tuple("Search").field(config).finish(),
            Self::Filter(config) => f.debug_tuple("Filter").field(config).finish(),
            Self::Ordering(config) => f.debug_tuple("Ordering").field(config).finish(),
            Self::Pagination(config) => f.debug_tuple("Pagination").field(config).finish(),
            Self::Custom(factory) => f.debug_tuple("Custom").field(&factory.name()).finish(),
        }
    }
}

impl From<SearchConfig> for ComponentConfig {
    fn from(config: SearchConfig) -> Self {
        Self::Search(Arc::new(config))
    }
}

impl From<FilterConfig> for ComponentConfig {
    fn from(config: FilterConfig) -> Self {
        Self::Filter(Arc::new(config))
    }
}

impl From<OrderingConfig> for ComponentConfig {
    fn from(config: OrderingConfig) -> Self {
        Self::Ordering(Arc::new(config))
    }
}

impl From<PaginationConfig> for ComponentConfig {
    fn from(config: PaginationConfig) -> Self {
        Self::Pagination(Arc::new(config))
    }
}
