//! Directus field types
//!
//! See <https://docs.directus.io/user-guide/overview/glossary.html#types>.
//! Each type maps to the client-side value kind used for payload checks.

use std::fmt;
use std::str::FromStr;

/// Directus field type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Virtual field pointing to related rows (o2m, m2m, presentation)
    Alias,
    BigInteger,
    Binary,
    Boolean,
    Csv,
    Date,
    DateTime,
    Decimal,
    Float,
    /// `geometry` and its subtypes (`geometry.Point`, ...)
    Geometry,
    Hash,
    Integer,
    Json,
    String,
    Text,
    Time,
    Timestamp,
    Uuid,
    /// Anything this client does not know; never validated
    Unknown(String),
}

/// Value class a field type accepts on the client side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Float,
    String,
    Boolean,
    Bytes,
    Json,
    Csv,
    Relation,
    Geometry,
    Any,
}

impl ValueKind {
    /// Short name shown in field tables
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Integer => "int",
            ValueKind::Float => "float",
            ValueKind::String => "str",
            ValueKind::Boolean => "bool",
            ValueKind::Bytes => "bytes",
            ValueKind::Json => "json",
            ValueKind::Csv => "csv",
            ValueKind::Relation => "alias",
            ValueKind::Geometry => "geometry",
            ValueKind::Any => "any",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldType {
    /// Parse a type name as returned by the fields endpoint.
    ///
    /// Case-insensitive; unknown names are kept verbatim.
    pub fn parse(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "alias" => FieldType::Alias,
            "biginteger" | "bigint" => FieldType::BigInteger,
            "binary" => FieldType::Binary,
            "boolean" => FieldType::Boolean,
            "csv" => FieldType::Csv,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "decimal" => FieldType::Decimal,
            "float" => FieldType::Float,
            "hash" => FieldType::Hash,
            "integer" => FieldType::Integer,
            "json" => FieldType::Json,
            "string" | "character varying" | "varchar" => FieldType::String,
            "text" => FieldType::Text,
            "time" => FieldType::Time,
            "timestamp" => FieldType::Timestamp,
            "uuid" => FieldType::Uuid,
            g if g.starts_with("geometry") => FieldType::Geometry,
            _ => FieldType::Unknown(name.to_string()),
        }
    }

    /// Canonical Directus name
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Alias => "alias",
            FieldType::BigInteger => "bigInteger",
            FieldType::Binary => "binary",
            FieldType::Boolean => "boolean",
            FieldType::Csv => "csv",
            FieldType::Date => "date",
            FieldType::DateTime => "dateTime",
            FieldType::Decimal => "decimal",
            FieldType::Float => "float",
            FieldType::Geometry => "geometry",
            FieldType::Hash => "hash",
            FieldType::Integer => "integer",
            FieldType::Json => "json",
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Time => "time",
            FieldType::Timestamp => "timestamp",
            FieldType::Uuid => "uuid",
            FieldType::Unknown(name) => name,
        }
    }

    /// Value kind accepted for this type
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldType::Integer | FieldType::BigInteger => ValueKind::Integer,
            FieldType::Float | FieldType::Decimal => ValueKind::Float,
            FieldType::String
            | FieldType::Text
            | FieldType::Uuid
            | FieldType::Hash
            | FieldType::Date
            | FieldType::Time
            | FieldType::DateTime
            | FieldType::Timestamp => ValueKind::String,
            FieldType::Boolean => ValueKind::Boolean,
            FieldType::Binary => ValueKind::Bytes,
            FieldType::Json => ValueKind::Json,
            FieldType::Csv => ValueKind::Csv,
            FieldType::Alias => ValueKind::Relation,
            FieldType::Geometry => ValueKind::Geometry,
            FieldType::Unknown(_) => ValueKind::Any,
        }
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
