//! Read-side registry over admin-defined field definitions.

use std::time::Duration;

use indexmap::IndexMap;

use crate::{errors::RegistryError, store::FieldSource, types::FieldDefinition};

/// Window a definition fetch may take before it is treated as failed.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only lookup facade for dynamic field definitions.
///
/// The registry owns nothing but an injected [`FieldSource`] and a fetch
/// timeout; connection lifecycle belongs to whoever built the source.
/// Lookups degrade to empty results on any failure so that the surrounding
/// entity workflow (saving a vendor, rendering a service form) never blocks
/// on the custom-field enhancement.
#[derive(Debug, Clone)]
pub struct FieldRegistry<S> {
    source: S,
    fetch_timeout: Duration,
}

impl<S> FieldRegistry<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Replace the timeout applied to every source read.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

impl<S: FieldSource> FieldRegistry<S> {
    /// Visible definitions for `entity_type`, ascending by `display_order`.
    ///
    /// Ties keep the order the store returned them in. Failures are logged
    /// and collapse to an empty list: callers proceed with zero dynamic
    /// fields instead of failing their own operation.
    pub async fn get_fields(&mut self, entity_type: &str) -> Vec<FieldDefinition> {
        match self.try_get_fields(entity_type).await {
            Ok(fields) => fields,
            Err(err) => {
                log::warn!(
                    "custom field lookup for `{entity_type}` failed, continuing without dynamic fields: {err}"
                );
                Vec::new()
            }
        }
    }

    /// Same as [`get_fields`](Self::get_fields) but surfaces the failure,
    /// for callers that want to distinguish "no fields" from "store down".
    pub async fn try_get_fields(&mut self, entity_type: &str) -> Result<Vec<FieldDefinition>, RegistryError> {
        let timeout = self.fetch_timeout;
        let fetched = tokio::time::timeout(timeout, self.source.fetch_definitions(entity_type))
            .await
            .map_err(|_| RegistryError::Timeout { timeout })??;

        let mut fields: Vec<FieldDefinition> =
            fetched.into_iter().filter(|field| field.is_visible).collect();
        // Sources are asked to sort, but the ordering guarantee is made
        // here; sort_by_key is stable so ties keep source order.
        fields.sort_by_key(|field| field.display_order);
        Ok(fields)
    }

    /// Visible definitions grouped by section, sections in first-seen order.
    pub async fn get_fields_by_section(
        &mut self,
        entity_type: &str,
    ) -> IndexMap<String, Vec<FieldDefinition>> {
        group_by_section(self.get_fields(entity_type).await)
    }
}

/// Partition an ordered field list by section label.
///
/// Sections appear in the order their first field does; fields keep their
/// relative order within each section. Unlabeled fields land under
/// [`DEFAULT_SECTION`](crate::types::DEFAULT_SECTION).
pub fn group_by_section(fields: Vec<FieldDefinition>) -> IndexMap<String, Vec<FieldDefinition>> {
    let mut sections: IndexMap<String, Vec<FieldDefinition>> = IndexMap::new();
    for field in fields {
        let section = field.section().to_string();
        sections.entry(section).or_default().push(field);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_SECTION;

    fn field(name: &str, section: Option<&str>) -> FieldDefinition {
        FieldDefinition {
            field_name: name.to_string(),
            field_label: name.to_string(),
            section: section.map(str::to_string),
            ..FieldDefinition::default()
        }
    }

    #[test]
    fn sections_in_first_seen_order() {
        let grouped = group_by_section(vec![
            field("gst", Some("compliance")),
            field("city", None),
            field("pan", Some("compliance")),
            field("nick", Some("")),
        ]);

        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, ["compliance", DEFAULT_SECTION]);
        assert_eq!(grouped["compliance"].len(), 2);
        assert_eq!(grouped["compliance"][0].field_name, "gst");
        assert_eq!(grouped["compliance"][1].field_name, "pan");
        assert_eq!(grouped[DEFAULT_SECTION][0].field_name, "city");
        assert_eq!(grouped[DEFAULT_SECTION][1].field_name, "nick");
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(group_by_section(Vec::new()).is_empty());
    }
}
