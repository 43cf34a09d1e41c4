//! Model metadata.
//!
//! [`ModelMeta`] is the field registry a list view's source exposes. The
//! search component reads it to derive searchable fields automatically.

use crate::fields::FieldDef;
use crate::query::OrderBy;

/// Metadata about a model: its table, fields, and default ordering.
///
/// # Examples
///
/// ```
/// use viewcraft_db::fields::{FieldDef, FieldType};
/// use viewcraft_db::model::ModelMeta;
///
/// let meta = ModelMeta::new("blog", "post")
///     .field(FieldDef::new("title", FieldType::CharField))
///     .field(FieldDef::new("views", FieldType::IntegerField));
///
/// assert_eq!(meta.db_table, "blog_post");
/// assert!(meta.get_field("views").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ModelMeta {
    /// The application label (e.g., "blog").
    pub app_label: String,
    /// The model name in lowercase (e.g., "post").
    pub model_name: String,
    /// The database table name.
    pub db_table: String,
    /// Human-readable singular name.
    pub verbose_name: String,
    /// Default ordering for queries.
    pub ordering: Vec<OrderBy>,
    /// Field definitions, in declaration order.
    pub fields: Vec<FieldDef>,
}

impl ModelMeta {
    /// Creates metadata for `app_label.model_name` with table `app_label_model_name`.
    pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
        let app_label = app_label.into();
        let model_name = model_name.into().to_lowercase();
        Self {
            db_table: format!("{app_label}_{model_name}"),
            verbose_name: model_name.replace('_', " "),
            app_label,
            model_name,
            ordering: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the default ordering.
    #[must_use]
    pub fn ordering(mut self, ordering: Vec<OrderBy>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Looks up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the `app_label.model_name` label.
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }
}
