//! # viewcraft-views
//!
//! The component system for list views. A [`ComponentView`] owns a list
//! source and a set of [`ComponentConfig`]s; on every request it builds one
//! component per config, orders them by sequence, and threads the queryset
//! and the context through each component's hooks.
//!
//! ## Modules
//!
//! - [`component`] - The [`Component`] trait and hook points
//! - [`config`] - [`ComponentConfig`], the closed set of component kinds
//! - [`view`] - [`ListSource`], [`ComponentView`] and the async [`View`] trait
//! - [`components`] - Search, filter, ordering and pagination
//! - [`server`] - Serving views through Axum

pub mod component;
pub mod components;
pub mod config;
pub mod server;
pub mod view;

pub use component::{Component, ComponentFactory, Context, HookMethod};
pub use components::filter::FilterConfig;
pub use components::ordering::OrderingConfig;
pub use components::pagination::PaginationConfig;
pub use components::search::{
    Criterion, CriterionValue, EncodedToken, FieldKind, MatchType, SearchConfig, SearchFieldSpec,
    SearchForm, SearchState,
};
pub use config::ComponentConfig;
pub use server::ViewcraftApp;
pub use view::{ComponentView, ListSource, ModelListSource, View};
