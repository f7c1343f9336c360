use std::borrow::Cow;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type for field-definition lookups.
///
/// These errors are visible through [`try_get_fields`](crate::FieldRegistry::try_get_fields)
/// only; the plain lookup path logs them and degrades to an empty result.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The backing store did not answer within the configured window.
    #[error("field definition fetch timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The store answered with a payload that could not be interpreted.
    #[error("malformed store response: {message}")]
    Decode { message: String },

    /// Any other failure surfaced by a source implementation.
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

/// Collection of validation issues found in one pass over a candidate record.
#[derive(Debug, Error)]
#[error("validation failed for {} field(s)", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A single failed rule, keyed to the field it fired on.
///
/// `message` is user-facing copy for the form; `code` is a stable machine
/// identifier for the rule (e.g. `validation.required`).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for record-level validation outcomes.
pub type ValidationResult<T> = Result<T, ValidationError>;
