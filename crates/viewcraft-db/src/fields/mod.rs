//! Field definitions for model metadata.

mod types;

pub use types::{FieldDef, FieldType};
