//! Type coercion for raw field values.
//!
//! The fixed rule table the platform's models require: integers and
//! floating-point values are parsed from the value's text form, dates use
//! the platform's mandatory pattern, everything else becomes text. Nulls
//! pass through untouched. Date parsing is a stateless function, safe
//! under concurrent callers.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::UploadError;
use crate::record::{FieldType, FieldValue, DATE_FORMAT};
use crate::registry::FieldDef;

/// Render a JSON scalar the way the coercion rules see it: strings keep
/// their content, everything else uses its JSON text form.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a date in the platform's fixed `yyyy-MM-dd HH:mm:ss` pattern.
pub fn parse_date(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
}

/// Coerce one raw value to its field's declared type.
///
/// A `null` input is preserved as `FieldValue::Null` regardless of the
/// declared type. A value whose text form does not parse as the declared
/// type is an error that aborts the whole call.
pub fn coerce(field: &FieldDef, value: &Value) -> Result<FieldValue, UploadError> {
    if value.is_null() {
        return Ok(FieldValue::Null);
    }
    let text = value_to_text(value);
    match field.ty {
        FieldType::Int => text
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|e| coerce_error(field, &text, e)),
        FieldType::Double => text
            .parse::<f64>()
            .map(FieldValue::Double)
            .map_err(|e| coerce_error(field, &text, e)),
        FieldType::Date => parse_date(&text)
            .map(FieldValue::Date)
            .map_err(|e| coerce_error(field, &text, e)),
        FieldType::Text => Ok(FieldValue::Text(text)),
    }
}

fn coerce_error(field: &FieldDef, text: &str, source: impl std::fmt::Display) -> UploadError {
    UploadError::Coerce {
        field: field.name.clone(),
        reason: format!("{:?}: {}", text, source),
    }
}
