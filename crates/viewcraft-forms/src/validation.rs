//! Field-level validation for form processing.
//!
//! Errors accumulate rather than short-circuiting, so every invalid field
//! is reported at once.

use std::collections::HashMap;

use viewcraft_db::value::Value;

use crate::fields::{clean_field_value, FormFieldDef};

/// Cleans every field, filling `cleaned_data` on success or `errors` on failure.
///
/// Disabled fields skip validation and take their initial value.
pub fn clean_fields(
    field_defs: &[FormFieldDef],
    raw_data: &HashMap<String, Option<String>>,
    cleaned_data: &mut HashMap<String, Value>,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in field_defs {
        if field.disabled {
            if let Some(initial) = &field.initial {
                cleaned_data.insert(field.name.clone(), initial.clone());
            }
            continue;
        }

        let raw = raw_data.get(&field.name).and_then(|v| v.as_deref());

        match clean_field_value(field, raw) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                tracing::trace!(field = %field.name, ?field_errors, "form field rejected");
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}
