//! Field metadata parsed from the `fields/<collection>` endpoint

use serde::Deserialize;
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldType, ValueKind};

/// A collection field and its schema flags
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub is_indexed: bool,
    pub is_unique: bool,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub has_auto_increment: bool,
    pub is_required: bool,
    /// Maximum string length, when the column declares one
    pub max_length: Option<u64>,
    pub default_value: Option<Value>,
}

#[derive(Deserialize)]
struct RawField {
    field: String,
    #[serde(rename = "type", default)]
    field_type: Option<String>,
    #[serde(default)]
    schema: Option<RawSchema>,
    #[serde(default)]
    meta: Option<RawMeta>,
}

#[derive(Deserialize, Default)]
struct RawSchema {
    #[serde(default)]
    is_indexed: Option<bool>,
    #[serde(default)]
    is_unique: Option<bool>,
    #[serde(default)]
    is_nullable: Option<bool>,
    #[serde(default)]
    is_primary_key: Option<bool>,
    #[serde(default)]
    has_auto_increment: Option<bool>,
    #[serde(default)]
    max_length: Option<u64>,
    #[serde(default)]
    default_value: Option<Value>,
}

#[derive(Deserialize, Default)]
struct RawMeta {
    #[serde(default)]
    required: Option<bool>,
}

impl Field {
    /// Create a field with all flags off
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_indexed: false,
            is_unique: false,
            is_nullable: false,
            is_primary_key: false,
            has_auto_increment: false,
            is_required: false,
            max_length: None,
            default_value: None,
        }
    }

    /// Parse a raw field object.
    ///
    /// Missing `schema` / `meta` blocks (alias fields) leave every flag off.
    pub fn from_value(data: &Value) -> SchemaResult<Self> {
        match data.as_object() {
            Some(obj) if !obj.is_empty() => {}
            _ => return Err(SchemaError::InvalidFieldData("Field data is empty".into())),
        }

        let raw: RawField = serde_json::from_value(data.clone())
            .map_err(|e| SchemaError::InvalidFieldData(e.to_string()))?;
        let schema = raw.schema.unwrap_or_default();
        let meta = raw.meta.unwrap_or_default();

        Ok(Self {
            field_type: FieldType::parse(raw.field_type.as_deref().unwrap_or("unknown")),
            name: raw.field,
            is_indexed: schema.is_indexed.unwrap_or(false),
            is_unique: schema.is_unique.unwrap_or(false),
            is_nullable: schema.is_nullable.unwrap_or(false),
            is_primary_key: schema.is_primary_key.unwrap_or(false),
            has_auto_increment: schema.has_auto_increment.unwrap_or(false),
            is_required: meta.required.unwrap_or(false),
            max_length: schema.max_length,
            default_value: schema.default_value.filter(|v| !v.is_null()),
        })
    }

    /// Parse the array returned by `fields/<collection>`
    pub fn list_from_value(data: &Value) -> SchemaResult<Vec<Self>> {
        let items = data.as_array().ok_or_else(|| {
            SchemaError::InvalidFieldData("expected an array of fields".into())
        })?;
        items.iter().map(Self::from_value).collect()
    }

    /// Value kind accepted by this field
    pub fn kind(&self) -> ValueKind {
        self.field_type.kind()
    }

    /// Whether Directus fills this field when it is omitted on insert
    pub fn is_generated(&self) -> bool {
        self.is_primary_key
            && (self.has_auto_increment || self.field_type == FieldType::Uuid)
    }

    // Builder helpers, mostly for tests

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.has_auto_increment = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn with_max_length(mut self, max_length: u64) -> Self {
        self.max_length = Some(max_length);
        self
    }
}
