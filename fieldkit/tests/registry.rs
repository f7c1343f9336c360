//! Registry behavior against well-behaved, failing, and hanging sources.

use std::time::Duration;

use fieldkit::{
    FieldDefinition, FieldRegistry, FieldSource, MemoryFieldSource, RegistryError,
};

struct FailingSource;

impl FieldSource for FailingSource {
    async fn fetch_definitions(&mut self, _entity_type: &str) -> Result<Vec<FieldDefinition>, RegistryError> {
        Err(RegistryError::Other {
            message: "store unavailable".into(),
        })
    }
}

struct HangingSource;

impl FieldSource for HangingSource {
    async fn fetch_definitions(&mut self, _entity_type: &str) -> Result<Vec<FieldDefinition>, RegistryError> {
        std::future::pending().await
    }
}

fn definition(entity_type: &str, name: &str, order: i64) -> FieldDefinition {
    FieldDefinition {
        id: format!("fd_{name}"),
        entity_type: entity_type.to_string(),
        field_name: name.to_string(),
        field_label: name.to_string(),
        display_order: order,
        ..FieldDefinition::default()
    }
}

#[tokio::test]
async fn empty_store_yields_empty_results() {
    let mut registry = FieldRegistry::new(MemoryFieldSource::default());
    assert!(registry.get_fields("vendors").await.is_empty());
    assert!(registry.get_fields_by_section("vendors").await.is_empty());
}

#[tokio::test]
async fn lookup_failure_degrades_to_empty() {
    let mut registry = FieldRegistry::new(FailingSource);
    assert!(registry.get_fields("vendors").await.is_empty());
    assert!(registry.get_fields_by_section("vendors").await.is_empty());
}

#[tokio::test]
async fn try_get_fields_surfaces_the_failure() {
    let mut registry = FieldRegistry::new(FailingSource);
    let err = registry.try_get_fields("vendors").await.unwrap_err();
    assert!(matches!(err, RegistryError::Other { .. }));
}

#[tokio::test]
async fn slow_source_times_out_and_degrades() {
    let mut registry =
        FieldRegistry::new(HangingSource).with_fetch_timeout(Duration::from_millis(20));
    assert!(registry.get_fields("vendors").await.is_empty());

    let err = registry.try_get_fields("vendors").await.unwrap_err();
    assert!(matches!(err, RegistryError::Timeout { .. }));
}

#[tokio::test]
async fn fields_sorted_by_display_order_with_stable_ties() {
    let source = MemoryFieldSource::default()
        .with(definition("vendors", "third", 2))
        .with(definition("vendors", "first", 1))
        .with(definition("vendors", "fourth", 2))
        .with(definition("vendors", "second", 1));

    let mut registry = FieldRegistry::new(source);
    let names: Vec<String> = registry
        .get_fields("vendors")
        .await
        .into_iter()
        .map(|field| field.field_name)
        .collect();
    assert_eq!(names, ["first", "second", "third", "fourth"]);
}

#[tokio::test]
async fn hidden_and_foreign_definitions_are_excluded() {
    let mut hidden = definition("vendors", "internal_score", 0);
    hidden.is_visible = false;

    let source = MemoryFieldSource::default()
        .with(hidden)
        .with(definition("services", "duration", 0))
        .with(definition("vendors", "city", 1));

    let mut registry = FieldRegistry::new(source);
    let fields = registry.get_fields("vendors").await;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field_name, "city");
}

#[tokio::test]
async fn sections_follow_first_seen_order() {
    let mut gst = definition("vendors", "gst", 1);
    gst.section = Some("compliance".to_string());
    let city = definition("vendors", "city", 2);
    let mut pan = definition("vendors", "pan", 3);
    pan.section = Some("compliance".to_string());

    let source = MemoryFieldSource::default().with(gst).with(city).with(pan);
    let mut registry = FieldRegistry::new(source);

    let grouped = registry.get_fields_by_section("vendors").await;
    let sections: Vec<&str> = grouped.keys().map(String::as_str).collect();
    assert_eq!(sections, ["compliance", "general"]);

    let compliance: Vec<&str> = grouped["compliance"].iter().map(|f| f.field_name.as_str()).collect();
    assert_eq!(compliance, ["gst", "pan"]);
    assert_eq!(grouped["general"][0].field_name, "city");
}
