//! Field-level validation of candidate values.
//!
//! Checks run in a fixed order and stop at the first failure: required,
//! empty-optional short-circuit, numeric bounds, length bounds, pattern,
//! email/URL format, select membership. The validator holds no state,
//! performs no I/O, and never mutates the definition or the value, so it is
//! safe to call from any number of concurrent contexts.

use std::borrow::Cow;

use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    errors::{ValidationError, ValidationIssue, ValidationResult},
    types::{FieldDefinition, FieldType},
    validators::{is_blank, is_valid_email, is_valid_url},
};

/// Validate one candidate value against one field definition.
///
/// `None` means the field is absent from the submitted record; `null` and
/// `""` are treated the same as absent. Returns the first failing rule as a
/// [`ValidationIssue`] whose message is ready for display next to the field.
pub fn validate(field: &FieldDefinition, value: Option<&Value>) -> Result<(), ValidationIssue> {
    if is_blank(value) {
        if field.is_required {
            return Err(issue(
                field,
                "validation.required",
                format!("{} is required", field.field_label),
            ));
        }
        // Empty and optional: no further rules apply.
        return Ok(());
    }
    let Some(value) = value else {
        return Ok(());
    };

    let rules = field.validation_rules.as_ref();

    if field.field_type == FieldType::Number {
        let Some(candidate) = numeric_from_value(value) else {
            return Err(issue(
                field,
                "validation.number",
                format!("{} must be a number", field.field_label),
            ));
        };
        if let Some(min) = rules.and_then(|r| r.min)
            && candidate < min
        {
            return Err(issue(
                field,
                "validation.min",
                format!("{} must be at least {}", field.field_label, min),
            ));
        }
        if let Some(max) = rules.and_then(|r| r.max)
            && candidate > max
        {
            return Err(issue(
                field,
                "validation.max",
                format!("{} must be at most {}", field.field_label, max),
            ));
        }
    }

    if matches!(field.field_type, FieldType::Text | FieldType::Textarea)
        && let Some(length) = char_count(value)
    {
        if let Some(min) = rules.and_then(|r| r.min)
            && (length as f64) < min
        {
            return Err(issue(
                field,
                "validation.min_length",
                format!("{} must be at least {} characters", field.field_label, min),
            ));
        }
        if let Some(max) = rules.and_then(|r| r.max)
            && (length as f64) > max
        {
            return Err(issue(
                field,
                "validation.max_length",
                format!("{} must be at most {} characters", field.field_label, max),
            ));
        }
    }

    // Pattern applies to every field type. A pattern that does not compile
    // is admin misconfiguration and constrains nothing.
    if let Some(pattern) = rules.and_then(|r| r.pattern.as_deref())
        && let Ok(regex) = Regex::new(pattern)
        && !regex.is_match(&text_of(value))
    {
        return Err(issue(
            field,
            "validation.pattern",
            format!("{} format is invalid", field.field_label),
        ));
    }

    if field.field_type == FieldType::Email && !is_valid_email(&text_of(value)) {
        return Err(issue(
            field,
            "validation.email",
            "Please enter a valid email address".to_string(),
        ));
    }

    if field.field_type == FieldType::Url && !is_valid_url(&text_of(value)) {
        return Err(issue(
            field,
            "validation.url",
            "Please enter a valid URL".to_string(),
        ));
    }

    if field.field_type == FieldType::Select
        && let Some(options) = field.options()
        && !options.iter().any(|option| option == text_of(value).as_ref())
    {
        return Err(issue(
            field,
            "validation.option",
            format!("{} must be one of {}", field.field_label, options.join(", ")),
        ));
    }

    Ok(())
}

/// Validate a whole candidate record, collecting one issue per failing field.
///
/// Keys the record holds but no definition describes are ignored; absent keys
/// are validated as unset values, so required fields without defaults fail
/// here.
pub fn validate_record(fields: &[FieldDefinition], record: &Map<String, Value>) -> ValidationResult<()> {
    let mut issues = Vec::new();
    for field in fields {
        if let Err(found) = validate(field, record.get(field.field_name.as_str())) {
            issues.push(found);
        }
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(issues))
    }
}

fn issue(field: &FieldDefinition, code: &str, message: String) -> ValidationIssue {
    ValidationIssue::new(field.field_name.clone(), code, message)
}

fn numeric_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(string) => string.parse::<f64>().ok(),
        _ => None,
    }
}

fn char_count(value: &Value) -> Option<usize> {
    value.as_str().map(|s| s.chars().count())
}

fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(string) => Cow::Borrowed(string.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
