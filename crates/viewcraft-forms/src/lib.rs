//! # viewcraft-forms
//!
//! Forms for viewcraft components. Provides field definitions with
//! type-level cleaning, widgets for HTML rendering, bound fields, and
//! [`BaseForm`], the form the search component binds its state to.
//!
//! Validation is synchronous: component forms only coerce and check the
//! submitted strings, so nothing here needs I/O.

pub mod bound_field;
pub mod fields;
pub mod form;
pub mod validation;
pub mod widgets;

pub use bound_field::BoundField;
pub use fields::{clean_field_value, FormFieldDef, FormFieldType};
pub use form::{BaseForm, Form};
pub use widgets::{Widget, WidgetType};
