//! Default-value merging for candidate records.
//!
//! Defaulting and validation are separate passes: a declared default is
//! copied in verbatim and may still fail validation if the admin configured
//! it badly.

use serde_json::{Map, Number, Value};

use crate::types::{FieldDefinition, FieldType};

/// Fill every field absent from `record` with its definition's declared
/// default, coerced to the field's semantic type.
///
/// Only strictly-missing keys are filled; a key holding `null` or `""` was
/// supplied by the caller and stays untouched. Definitions without a default,
/// or with an empty one, contribute nothing. The input record is not
/// modified; the merged copy is returned.
pub fn apply_defaults(fields: &[FieldDefinition], record: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = record.clone();
    for field in fields {
        if merged.contains_key(field.field_name.as_str()) {
            continue;
        }
        let Some(raw) = field.default_value.as_deref() else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        merged.insert(field.field_name.clone(), coerce_default(field.field_type, raw));
    }
    merged
}

/// Interpret a stored default string as the value shape its field type
/// implies. Never fails: anything that does not parse stays a string.
fn coerce_default(field_type: FieldType, raw: &str) -> Value {
    match field_type {
        FieldType::Checkbox => Value::Bool(raw == "true"),
        FieldType::Number => parse_number(raw)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
        FieldType::Json => {
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
        _ => Value::String(raw.to_string()),
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Number::from(int));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}
