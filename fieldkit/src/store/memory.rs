use crate::{errors::RegistryError, store::FieldSource, types::FieldDefinition};

/// A [`FieldSource`] serving definitions out of process memory.
///
/// Used by tests and by callers that load definitions once at startup.
/// Filtering and ordering match what the remote source's index does.
#[derive(Debug, Clone, Default)]
pub struct MemoryFieldSource {
    definitions: Vec<FieldDefinition>,
}

impl MemoryFieldSource {
    pub fn new(definitions: Vec<FieldDefinition>) -> Self {
        Self { definitions }
    }

    /// Add one definition, returning `self` for chained setup.
    pub fn with(mut self, definition: FieldDefinition) -> Self {
        self.definitions.push(definition);
        self
    }
}

impl FieldSource for MemoryFieldSource {
    async fn fetch_definitions(&mut self, entity_type: &str) -> Result<Vec<FieldDefinition>, RegistryError> {
        let mut matching: Vec<FieldDefinition> = self
            .definitions
            .iter()
            .filter(|definition| definition.entity_type == entity_type && definition.is_visible)
            .cloned()
            .collect();
        matching.sort_by_key(|definition| definition.display_order);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(entity_type: &str, name: &str, order: i64, visible: bool) -> FieldDefinition {
        FieldDefinition {
            id: format!("fd_{name}"),
            entity_type: entity_type.to_string(),
            field_name: name.to_string(),
            field_label: name.to_string(),
            display_order: order,
            is_visible: visible,
            ..FieldDefinition::default()
        }
    }

    #[tokio::test]
    async fn scopes_to_entity_type_and_visibility() {
        let mut source = MemoryFieldSource::default()
            .with(definition("vendors", "gst", 2, true))
            .with(definition("vendors", "hidden", 1, false))
            .with(definition("services", "duration", 0, true))
            .with(definition("vendors", "city", 1, true));

        let fields = source.fetch_definitions("vendors").await.unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, ["city", "gst"]);
    }
}
