//! Dynamic custom-fields core for a marketplace application.
//!
//! Administrators define extra typed fields for business entities (vendors,
//! services, categories) at runtime; this crate reads those definitions,
//! merges declared defaults into in-progress records, and validates
//! submitted values before persistence. Three pieces:
//!
//! - [`FieldRegistry`] — ordered, sectioned lookup of definitions per entity
//!   type, degrading to an empty result on any store failure
//! - [`validate()`](fn@validate) / [`validate_record`] — pure pass/fail
//!   checks producing user-facing messages
//! - [`apply_defaults`] — fills absent record keys from stored defaults
//!
//! The registry reads through the narrow [`FieldSource`] seam;
//! [`RedisFieldSource`] is the remote implementation and
//! [`MemoryFieldSource`] the in-process one. All validation and defaulting
//! is pure computation over function-local inputs and can run concurrently
//! without coordination.

pub mod defaults;
pub mod errors;
pub mod keys;
pub mod registry;
pub mod store;
pub mod types;
pub mod validate;
pub mod validators;

pub use defaults::apply_defaults;
pub use errors::{RegistryError, ValidationError, ValidationIssue, ValidationResult};
pub use registry::{DEFAULT_FETCH_TIMEOUT, FieldRegistry, group_by_section};
pub use store::{FieldSource, MemoryFieldSource, RedisFieldSource};
pub use types::{DEFAULT_SECTION, FieldDefinition, FieldOptions, FieldType, InputKind, ValidationRules};
pub use validate::{validate, validate_record};

// Re-export redis so users don't need to depend on a specific redis version.
pub use redis;
pub use redis::aio::ConnectionManager;
