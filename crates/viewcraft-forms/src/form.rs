//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait covers binding data from a `QueryDict`, validation,
//! and context generation. [`BaseForm`] is a concrete form built from a
//! list of field definitions at runtime, which is how components assemble
//! forms whose fields depend on their configuration.

use std::collections::HashMap;

use serde_json::json;
use viewcraft_db::value::Value;
use viewcraft_http::QueryDict;

use crate::bound_field::BoundField;
use crate::fields::FormFieldDef;
use crate::validation;

/// The core form trait.
pub trait Form: Send + Sync {
    /// Returns the form's field definitions.
    fn fields(&self) -> &[FormFieldDef];

    /// Returns the form prefix (for namespacing multiple forms on one page).
    fn prefix(&self) -> Option<&str>;

    /// Binds raw form data to this form.
    fn bind(&mut self, data: &QueryDict);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Validates the bound data. After calling this, `errors()` and
    /// `cleaned_data()` are populated. An unbound form is never valid.
    fn is_valid(&mut self) -> bool;

    /// Returns per-field validation errors.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned (validated and coerced) data.
    fn cleaned_data(&self) -> &HashMap<String, Value>;

    /// Generates the JSON context used to render this form.
    fn as_context(&self) -> serde_json::Value;

    /// Cross-field validation hook. The default accepts everything.
    fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }
}

/// A general-purpose form implementation.
#[derive(Debug, Clone, Default)]
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Option<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, Value>,
}

impl BaseForm {
    /// Creates a new, unbound `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            ..Self::default()
        }
    }

    /// Sets the form prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Returns the submitted value of a field, before cleaning.
    pub fn raw_value(&self, name: &str) -> Option<&str> {
        self.raw_data.get(name).and_then(|v| v.as_deref())
    }

    /// Returns bound fields for rendering.
    ///
    /// A bound form shows the submitted data; an unbound one shows each
    /// field's initial value.
    pub fn bound_fields(&self) -> Vec<BoundField> {
        self.field_defs
            .iter()
            .map(|field| {
                let data = if self.bound {
                    self.raw_data.get(&field.name).cloned().flatten()
                } else {
                    field.initial.as_ref().and_then(Value::as_text)
                };
                let errors = self.errors.get(&field.name).cloned().unwrap_or_default();
                BoundField::new(field, data, errors, self.prefix.as_deref())
            })
            .collect()
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors.get("__all__").map_or(&[], Vec::as_slice)
    }
}

impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn bind(&mut self, data: &QueryDict) {
        self.bound = true;
        self.raw_data.clear();
        self.errors.clear();
        self.cleaned_data.clear();

        for field in &self.field_defs {
            let html_name = match &self.prefix {
                Some(p) => format!("{p}-{}", field.name),
                None => field.name.clone(),
            };
            let widget = crate::widgets::create_widget(field.widget, &[]);
            let value = widget.value_from_data(data, &html_name);
            self.raw_data.insert(field.name.clone(), value);
        }
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();

        validation::clean_fields(
            &self.field_defs,
            &self.raw_data,
            &mut self.cleaned_data,
            &mut self.errors,
        );

        if let Err(form_errors) = self.clean() {
            for (key, msgs) in form_errors {
                self.errors.entry(key).or_default().extend(msgs);
            }
        }

        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }

    fn as_context(&self) -> serde_json::Value {
        let fields: Vec<serde_json::Value> =
            self.bound_fields().iter().map(BoundField::to_json).collect();

        json!({
            "fields": fields,
            "errors": self.errors,
            "non_field_errors": self.non_field_errors(),
            "is_bound": self.bound,
        })
    }
}
