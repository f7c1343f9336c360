use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Section label applied when a definition declares none.
pub const DEFAULT_SECTION: &str = "general";

/// Wire tag describing what shape a dynamic field's value takes.
///
/// The set is closed: the admin console only writes these ten tags. A stored
/// document carrying anything else fails to decode and is skipped by the
/// source rather than surfacing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Email,
    Url,
    Select,
    Checkbox,
    Date,
    File,
    Json,
}

/// Which form widget a calling surface should render for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Textarea,
    Number,
    Email,
    Url,
    Select,
    Checkbox,
    Date,
    File,
}

impl FieldType {
    /// Widget lookup for form rendering. `json` is edited as free text in
    /// the textarea widget.
    pub fn input_kind(self) -> InputKind {
        match self {
            FieldType::Text => InputKind::Text,
            FieldType::Textarea | FieldType::Json => InputKind::Textarea,
            FieldType::Number => InputKind::Number,
            FieldType::Email => InputKind::Email,
            FieldType::Url => InputKind::Url,
            FieldType::Select => InputKind::Select,
            FieldType::Checkbox => InputKind::Checkbox,
            FieldType::Date => InputKind::Date,
            FieldType::File => InputKind::File,
        }
    }
}

/// Type-specific metadata bag attached to a definition.
///
/// `select` fields carry their candidate values in `options`; anything else
/// the admin console stores alongside them survives in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-field constraints declared by the admin console.
///
/// `min`/`max` bound the numeric value for `number` fields and the character
/// count for `text`/`textarea` fields. `pattern` is a regular expression the
/// stringified value must match, whatever the field type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

fn default_visible() -> bool {
    true
}

/// One dynamic field attached to an entity type, as stored by the admin
/// console.
///
/// `entity_type` is a plain partition tag ("vendors", "services", ...), not a
/// foreign key. `default_value` is stored as text whatever the field type and
/// is coerced at use time by the defaulting engine. This crate never mutates
/// a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub entity_type: String,
    pub field_name: String,
    pub field_label: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_options: Option<FieldOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for FieldDefinition {
    /// Matches the store's column defaults: visible, optional, order 0.
    fn default() -> Self {
        Self {
            id: String::new(),
            entity_type: String::new(),
            field_name: String::new(),
            field_label: String::new(),
            field_type: FieldType::Text,
            field_options: None,
            placeholder: None,
            default_value: None,
            is_required: false,
            is_visible: true,
            display_order: 0,
            section: None,
            validation_rules: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl FieldDefinition {
    /// Section this field renders under; absent or empty maps to
    /// [`DEFAULT_SECTION`].
    pub fn section(&self) -> &str {
        match self.section.as_deref() {
            Some(section) if !section.is_empty() => section,
            _ => DEFAULT_SECTION,
        }
    }

    /// Candidate values for `select` fields. `None` when the definition has
    /// no options configured, in which case the value is unconstrained.
    pub fn options(&self) -> Option<&[String]> {
        self.field_options
            .as_ref()
            .map(|opts| opts.options.as_slice())
            .filter(|options| !options.is_empty())
    }
}
