//! Fetch → default → validate against a live Redis with RedisJSON/RediSearch.
//!
//! Seeds one vendor definition the way the admin console would, then walks
//! the form flow. Set `REDIS_URL` to point somewhere other than localhost.

use fieldkit::{
    FieldDefinition, FieldOptions, FieldRegistry, FieldType, RedisFieldSource, apply_defaults,
    group_by_section, keys::KeyContext, validate_record,
};
use serde_json::{Map, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let mut source = RedisFieldSource::connect(&url, "mkt").await?;
    source.ensure_index().await?;

    // Simulate the admin console writing one definition.
    let definition = FieldDefinition {
        id: "fd_country".to_string(),
        entity_type: "vendors".to_string(),
        field_name: "country".to_string(),
        field_label: "Country".to_string(),
        field_type: FieldType::Select,
        field_options: Some(FieldOptions {
            options: vec!["IN".to_string(), "US".to_string()],
            ..FieldOptions::default()
        }),
        default_value: Some("IN".to_string()),
        is_required: true,
        display_order: 1,
        ..FieldDefinition::default()
    };
    let key = KeyContext::new(source.prefix()).definition(&definition.id);
    let mut conn = source.connection();
    fieldkit::redis::cmd("JSON.SET")
        .arg(&key)
        .arg("$")
        .arg(serde_json::to_string(&definition)?)
        .query_async::<()>(&mut conn)
        .await?;

    let mut registry = FieldRegistry::new(source);
    let fields = registry.get_fields("vendors").await;

    for (section, section_fields) in group_by_section(fields.clone()) {
        println!("[{section}]");
        for field in &section_fields {
            println!("  {} ({:?} widget)", field.field_label, field.field_type.input_kind());
        }
    }

    let record = apply_defaults(&fields, &Map::new());
    println!("defaulted record: {}", Value::Object(record.clone()));

    match validate_record(&fields, &record) {
        Ok(()) => println!("record is valid"),
        Err(err) => {
            for issue in err.issues {
                println!("{}: {}", issue.field, issue.message);
            }
        }
    }

    Ok(())
}
