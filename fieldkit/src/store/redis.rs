//! RediSearch-backed field definition source.
//!
//! Definitions are JSON documents at `{prefix}:custom_fields:{id}`, served
//! through an index filtered on entity type and visibility and sorted by
//! display order. The admin console writes the documents; this source only
//! reads them.

use redis::{Value as RedisValue, aio::ConnectionManager, cmd, from_redis_value};

use crate::{errors::RegistryError, keys::KeyContext, store::FieldSource, types::FieldDefinition};

/// Upper bound on definitions fetched per entity type in one read.
const MAX_DEFINITIONS: u64 = 512;

#[derive(Debug, Clone, Copy)]
enum IndexFieldType {
    Tag,
    Numeric,
}

#[derive(Debug, Clone, Copy)]
struct IndexField {
    path: &'static str,
    field_name: &'static str,
    field_type: IndexFieldType,
    sortable: bool,
}

const INDEX_SCHEMA: &[IndexField] = &[
    IndexField {
        path: "$.entity_type",
        field_name: "entity_type",
        field_type: IndexFieldType::Tag,
        sortable: false,
    },
    IndexField {
        path: "$.is_visible",
        field_name: "is_visible",
        field_type: IndexFieldType::Tag,
        sortable: false,
    },
    IndexField {
        path: "$.display_order",
        field_name: "display_order",
        field_type: IndexFieldType::Numeric,
        sortable: true,
    },
];

/// Field definition source reading JSON documents out of Redis.
#[derive(Clone)]
pub struct RedisFieldSource {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisFieldSource {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    /// Open a connection manager against `url` and wrap it as a source.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    /// Key prefix this source reads under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Get a clone of the connection manager for advanced operations.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Create the definitions index if it does not exist yet.
    pub async fn ensure_index(&mut self) -> Result<(), RegistryError> {
        let index_name = KeyContext::new(&self.prefix).index_name();
        let document_prefix = KeyContext::new(&self.prefix).document_prefix();

        let indexes: Vec<String> = cmd("FT._LIST").query_async(&mut self.conn).await?;
        if indexes.iter().any(|name| name == &index_name) {
            return Ok(());
        }

        let mut command = cmd("FT.CREATE");
        command.arg(&index_name);
        command.arg("ON").arg("JSON");
        command.arg("PREFIX").arg(1).arg(document_prefix);
        command.arg("SCHEMA");
        for field in INDEX_SCHEMA {
            command.arg(field.path);
            command.arg("AS").arg(field.field_name);
            match field.field_type {
                IndexFieldType::Tag => {
                    command.arg("TAG");
                }
                IndexFieldType::Numeric => {
                    command.arg("NUMERIC");
                }
            }
            if field.sortable {
                command.arg("SORTABLE");
            }
        }

        if let Err(err) = command.query_async::<()>(&mut self.conn).await {
            if index_exists_error(&err) {
                return Ok(());
            }
            return Err(err.into());
        }

        Ok(())
    }
}

impl FieldSource for RedisFieldSource {
    async fn fetch_definitions(&mut self, entity_type: &str) -> Result<Vec<FieldDefinition>, RegistryError> {
        let index_name = KeyContext::new(&self.prefix).index_name();
        let query = definitions_query(entity_type);

        let mut command = cmd("FT.SEARCH");
        command.arg(index_name);
        command.arg(query);
        command.arg("SORTBY").arg("display_order").arg("ASC");
        command.arg("LIMIT").arg(0).arg(MAX_DEFINITIONS);
        command.arg("RETURN").arg(1).arg("$");
        command.arg("DIALECT").arg(3);

        let raw: RedisValue = command.query_async(&mut self.conn).await?;
        parse_search_reply(&raw)
    }
}

/// Filter clause selecting visible definitions of one entity type.
fn definitions_query(entity_type: &str) -> String {
    format!(
        "(@entity_type:{{{}}}) (@is_visible:{{true}})",
        escape_for_tag_query(entity_type)
    )
}

/// Escape a value for use inside a RediSearch TAG filter clause.
///
/// Covers the TAG syntax characters, the JSON path separator, and the `-`
/// NOT operator.
fn escape_for_tag_query(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '$' | '{' | '}' | '\\' | '|' | '.' | '-') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Decode an `FT.SEARCH` reply: total count, then (key, document) pairs.
///
/// A document that cannot be read or deserialized is skipped with a warning
/// instead of failing the batch; one corrupt admin row must not blank an
/// entity's whole field set.
fn parse_search_reply(raw: &RedisValue) -> Result<Vec<FieldDefinition>, RegistryError> {
    let values: Vec<RedisValue> = from_redis_value(raw).map_err(|err| RegistryError::Decode {
        message: format!("failed to parse search response: {err}"),
    })?;

    if values.is_empty() {
        return Ok(Vec::new());
    }

    let mut definitions = Vec::new();
    let mut idx = 1;
    while idx + 1 < values.len() {
        let doc_value = &values[idx + 1];
        idx += 2;

        let payload = match extract_json_payload(doc_value) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("skipping unreadable field definition document: {err}");
                continue;
            }
        };
        match decode_document(&payload) {
            Ok(definition) => definitions.push(definition),
            Err(err) => {
                log::warn!("skipping malformed field definition document: {err}");
            }
        }
    }

    Ok(definitions)
}

fn decode_document(payload: &str) -> Result<FieldDefinition, serde_json::Error> {
    match serde_json::from_str::<FieldDefinition>(payload) {
        Ok(definition) => Ok(definition),
        Err(bare_err) => {
            // DIALECT 3 wraps the JSONPath result in an array.
            match serde_json::from_str::<Vec<FieldDefinition>>(payload) {
                Ok(mut wrapped) if !wrapped.is_empty() => Ok(wrapped.remove(0)),
                _ => Err(bare_err),
            }
        }
    }
}

fn extract_json_payload(value: &RedisValue) -> Result<String, RegistryError> {
    match value {
        // RESP2: flat [alias, payload, alias, payload, ...] array.
        RedisValue::Array(items) => {
            for chunk in items.chunks(2) {
                if chunk.len() != 2 {
                    continue;
                }
                let alias: String = from_redis_value(&chunk[0]).map_err(|err| RegistryError::Decode {
                    message: format!("invalid field alias in search document: {err}"),
                })?;
                if alias == "$" {
                    return from_redis_value(&chunk[1]).map_err(|err| RegistryError::Decode {
                        message: format!("invalid document payload: {err}"),
                    });
                }
            }
            Err(RegistryError::Decode {
                message: "search document missing `$` payload".to_string(),
            })
        }
        // RESP3 returns the alias/payload pairs as a map.
        RedisValue::Map(entries) => {
            for (alias_value, payload_value) in entries {
                let alias: String = from_redis_value(alias_value).map_err(|err| RegistryError::Decode {
                    message: format!("invalid field alias in search document: {err}"),
                })?;
                if alias == "$" {
                    return from_redis_value(payload_value).map_err(|err| RegistryError::Decode {
                        message: format!("invalid document payload: {err}"),
                    });
                }
            }
            Err(RegistryError::Decode {
                message: "search document missing `$` payload".to_string(),
            })
        }
        RedisValue::BulkString(bytes) => {
            String::from_utf8(bytes.clone()).map_err(|err| RegistryError::Decode {
                message: format!("document payload is not utf-8: {err}"),
            })
        }
        other => Err(RegistryError::Decode {
            message: format!("unexpected search document shape: {other:?}"),
        }),
    }
}

fn index_exists_error(err: &redis::RedisError) -> bool {
    let msg = err.to_string().to_ascii_lowercase();
    msg.contains("already exists") && msg.contains("index")
}
