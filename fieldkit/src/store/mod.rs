//! Backing-store boundary for field definitions.
//!
//! The registry reads through the narrow [`FieldSource`] seam so the store
//! client can be swapped and its lifecycle owned by the host application.

mod memory;
mod redis;

pub use self::memory::MemoryFieldSource;
pub use self::redis::RedisFieldSource;

use crate::{errors::RegistryError, types::FieldDefinition};

/// A remote or in-process collection of field definitions.
///
/// Implementations should return rows scoped to `entity_type`, visible only
/// and ordered by `display_order` where the store can express that; the
/// registry applies both again before handing results to callers, so a
/// source that cannot is still correct.
#[allow(async_fn_in_trait)]
pub trait FieldSource {
    async fn fetch_definitions(&mut self, entity_type: &str) -> Result<Vec<FieldDefinition>, RegistryError>;
}
