//! # viewcraft-db
//!
//! The query layer viewcraft components target. Components never talk to a
//! database directly: they translate their state into [`Q`](query::Q) trees,
//! and a [`QuerySet`](query::QuerySet) either evaluates those trees over
//! in-memory JSON rows or hands them to the [`SqlCompiler`](query::SqlCompiler)
//! to produce a parameterised `WHERE` clause.
//!
//! ## Module Overview
//!
//! - [`value`] - The backend-agnostic [`Value`](value::Value) enum
//! - [`fields`] - Field types and definitions
//! - [`model`] - [`ModelMeta`](model::ModelMeta), the per-model field registry
//! - [`query`] - Lookups, `Q` objects, SQL compilation and querysets

// - format_push_string: format! with push_str is clearer than write! for SQL generation
// - cast_precision_loss: i64-to-f64 casts are acceptable when comparing mixed numerics
// - return_self_not_must_use: builder pattern methods are self-documenting
#![allow(clippy::format_push_string)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]

pub mod fields;
pub mod model;
pub mod query;
pub mod value;

pub use fields::{FieldDef, FieldType};
pub use model::ModelMeta;
pub use query::{DatabaseBackendType, Lookup, OrderBy, QuerySet, SqlCompiler, Q};
pub use value::Value;
