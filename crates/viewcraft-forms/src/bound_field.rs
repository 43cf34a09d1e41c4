//! Bound fields: form fields paired with their data and errors.
//!
//! A [`BoundField`] is what a form hands out for rendering. It owns a
//! snapshot of the field metadata, the value to display, any validation
//! errors, and the widget used for rendering.

use std::collections::HashMap;

use serde_json::json;

use crate::fields::FormFieldDef;
use crate::widgets::{self, escape_html, Widget};

/// A form field bound to data and validation state.
pub struct BoundField {
    /// The field's HTML name attribute.
    pub name: String,
    /// Owned snapshot of the field definition.
    pub field: BoundFieldDef,
    /// The value displayed for this field: submitted data, or the initial
    /// value for an unbound form.
    pub data: Option<String>,
    /// Validation error messages for this field.
    pub errors: Vec<String>,
    /// The widget instance used for rendering.
    pub widget: Box<dyn Widget>,
}

/// Minimal field definition snapshot stored in a `BoundField`.
#[derive(Debug, Clone)]
pub struct BoundFieldDef {
    /// The field name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Help text.
    pub help_text: String,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is disabled.
    pub disabled: bool,
}

impl BoundField {
    /// Creates a new `BoundField` from a field definition and current state.
    pub fn new(
        field_def: &FormFieldDef,
        data: Option<String>,
        errors: Vec<String>,
        prefix: Option<&str>,
    ) -> Self {
        let html_name = match prefix {
            Some(p) => format!("{p}-{}", field_def.name),
            None => field_def.name.clone(),
        };

        let widget = widgets::create_widget(field_def.widget, field_def.field_type.choices());

        Self {
            name: html_name,
            field: BoundFieldDef {
                name: field_def.name.clone(),
                label: field_def.label.clone(),
                help_text: field_def.help_text.clone(),
                required: field_def.required,
                disabled: field_def.disabled,
            },
            data,
            errors,
            widget,
        }
    }

    /// Renders the widget HTML for this bound field.
    pub fn render(&self, extra_attrs: &HashMap<String, String>) -> String {
        let mut attrs = extra_attrs.clone();
        attrs.entry("id".to_string()).or_insert_with(|| self.auto_id());
        if self.field.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }
        self.widget.render(&self.name, self.data.as_deref(), &attrs)
    }

    /// Renders a `<label>` element for this field.
    pub fn label_tag(&self) -> String {
        let label = escape_html(&self.field.label);
        let label_id = self.widget.id_for_label(&self.auto_id());
        if label_id.is_empty() {
            format!("<label>{label}</label>")
        } else {
            format!(r#"<label for="{label_id}">{label}</label>"#)
        }
    }

    /// Returns the auto-generated HTML `id` for this field.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.name)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the error list as an HTML `<ul>` element.
    pub fn errors_as_ul(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        let items: String = self
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape_html(e)))
            .collect();
        format!(r#"<ul class="errorlist">{items}</ul>"#)
    }

    /// Returns the field as a JSON object for a view context.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "label": self.field.label,
            "help_text": self.field.help_text,
            "value": self.data,
            "widget": self.widget.widget_type().to_string(),
            "html": self.render(&HashMap::new()),
            "label_tag": self.label_tag(),
            "errors": self.errors,
            "required": self.field.required,
        })
    }
}

impl std::fmt::Debug for BoundField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundField")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}
