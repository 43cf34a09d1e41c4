//! Query building, evaluation, and compilation.
//!
//! - [`lookups`] - [`Lookup`] and [`Q`] for composable filters
//! - [`compiler`] - [`SqlCompiler`] for turning filters into parameterised SQL
//! - [`queryset`] - [`QuerySet`], a lazy query over in-memory JSON rows

pub mod compiler;
pub mod lookups;
pub mod queryset;

pub use compiler::{DatabaseBackendType, OrderBy, Query, SqlCompiler, WhereNode};
pub use lookups::{Lookup, Q};
pub use queryset::QuerySet;
