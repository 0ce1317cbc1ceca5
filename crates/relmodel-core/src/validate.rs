//! Field-constraint validation.
//!
//! Checks a record's `to_row` output against the constraints declared on its
//! `FieldInfo` slice. Primary key and auto-increment columns are exempt from
//! the required check so unsaved records validate before their key exists.

use crate::error::ValidationError;
use crate::field::FieldInfo;
use crate::value::Value;

/// Validate `(column, value)` pairs against field metadata.
///
/// Returns the collected errors; call `into_result()` for a `Result` view.
pub fn validate_fields(row: &[(&'static str, Value)], fields: &[FieldInfo]) -> ValidationError {
    let mut errors = ValidationError::new();

    for field in fields {
        let value = row
            .iter()
            .find(|(column, _)| *column == field.column_name)
            .map(|(_, value)| value);

        let is_missing = matches!(value, None | Some(Value::Null));

        if is_missing {
            if !field.nullable && !field.primary_key && !field.auto_increment {
                errors.add_required(field.name);
            }
            continue;
        }

        let Some(text) = value.and_then(Value::as_str) else {
            continue;
        };

        if let Some(min) = field.min_length {
            if text.chars().count() < min {
                errors.add_min_length(field.name, min, text.chars().count());
            }
        }
        if let Some(max) = field.max_length {
            if text.chars().count() > max {
                errors.add_max_length(field.name, max, text.chars().count());
            }
        }
        if let Some(pattern) = field.pattern {
            match regex::Regex::new(pattern) {
                Ok(re) => {
                    if !re.is_match(text) {
                        errors.add_pattern(field.name, pattern);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        field = field.name,
                        pattern,
                        error = %e,
                        "invalid validation pattern; skipping check"
                    );
                }
            }
        }
    }

    errors
}
