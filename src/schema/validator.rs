//! Payload validator for item writes
//!
//! Checks an insert or update payload against the collection's fields
//! before anything is sent:
//! - payload is a JSON object
//! - no keys outside the collection's fields
//! - value types match the field kind
//! - nulls only on nullable fields
//! - strings within `max_length`
//! - required fields present on insert
//! - primary key untouched on update
//!
//! Validation does not mutate the payload.

use serde_json::Value;

use super::errors::{json_type_name, SchemaError, SchemaResult, ValidationDetails};
use super::field::Field;
use super::types::{FieldType, ValueKind};

/// Validates write payloads against a set of fields
pub struct PayloadValidator<'a> {
    collection: &'a str,
    fields: &'a [Field],
}

impl<'a> PayloadValidator<'a> {
    pub fn new(collection: &'a str, fields: &'a [Field]) -> Self {
        Self { collection, fields }
    }

    /// Validates a payload for `POST items/<collection>`
    pub fn validate_insert(&self, payload: &Value) -> SchemaResult<()> {
        let obj = self.as_object(payload)?;

        for (key, value) in obj {
            let field = self.lookup(key)?;
            self.check_value(field, value)?;
        }

        for field in self.fields {
            if self.is_mandatory(field) && !obj.contains_key(&field.name) {
                return Err(self.fail(ValidationDetails::missing_field(&field.name)));
            }
        }

        Ok(())
    }

    /// Validates a patch for `PATCH items/<collection>/<id>`
    pub fn validate_update(&self, patch: &Value) -> SchemaResult<()> {
        let obj = self.as_object(patch)?;

        for (key, value) in obj {
            let field = self.lookup(key)?;
            if field.is_primary_key {
                return Err(self.fail(ValidationDetails::new(
                    key.as_str(),
                    "primary key to stay unchanged",
                    "primary key in patch",
                )));
            }
            self.check_value(field, value)?;
        }

        Ok(())
    }

    fn as_object<'v>(&self, payload: &'v Value) -> SchemaResult<&'v serde_json::Map<String, Value>> {
        payload.as_object().ok_or_else(|| {
            self.fail(ValidationDetails::type_mismatch(
                "$root",
                "object",
                json_type_name(payload),
            ))
        })
    }

    fn lookup(&self, name: &str) -> SchemaResult<&'a Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| self.fail(ValidationDetails::unknown_field(name)))
    }

    fn is_mandatory(&self, field: &Field) -> bool {
        field.is_required
            && field.default_value.is_none()
            && !field.is_generated()
            && field.field_type != FieldType::Alias
    }

    fn check_value(&self, field: &Field, value: &Value) -> SchemaResult<()> {
        if value.is_null() {
            if field.is_nullable || field.kind() == ValueKind::Any {
                return Ok(());
            }
            return Err(self.fail(ValidationDetails::null_value(&field.name)));
        }

        if !accepts(&field.field_type, value) {
            return Err(self.fail(ValidationDetails::type_mismatch(
                &field.name,
                field.field_type.as_str(),
                json_type_name(value),
            )));
        }

        if let (Some(max), Value::String(s)) = (field.max_length, value) {
            let len = s.chars().count();
            if len as u64 > max {
                return Err(self.fail(ValidationDetails::too_long(&field.name, max, len)));
            }
        }

        Ok(())
    }

    fn fail(&self, details: ValidationDetails) -> SchemaError {
        SchemaError::validation_failed(self.collection, details)
    }
}

/// Whether a non-null JSON value is acceptable for a field type
fn accepts(field_type: &FieldType, value: &Value) -> bool {
    match field_type.kind() {
        ValueKind::Integer => match value {
            Value::Number(n) => n.is_i64() || n.is_u64(),
            Value::String(s) if *field_type == FieldType::BigInteger => is_integer_string(s),
            _ => false,
        },
        ValueKind::Float => match value {
            Value::Number(_) => true,
            Value::String(s) if *field_type == FieldType::Decimal => s.trim().parse::<f64>().is_ok(),
            _ => false,
        },
        ValueKind::String | ValueKind::Bytes => value.is_string(),
        ValueKind::Boolean => value.is_boolean(),
        ValueKind::Csv => match value {
            Value::String(_) => true,
            Value::Array(items) => items.iter().all(Value::is_string),
            _ => false,
        },
        ValueKind::Geometry => value.is_object(),
        ValueKind::Json | ValueKind::Relation | ValueKind::Any => true,
    }
}

fn is_integer_string(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn books() -> Vec<Field> {
        vec![
            Field::new("id", FieldType::Integer).primary_key().auto_increment(),
            Field::new("title", FieldType::String).required().with_max_length(20),
            Field::new("rating", FieldType::Float).nullable(),
            Field::new("pages", FieldType::Integer),
            Field::new("isbn", FieldType::BigInteger).nullable(),
            Field::new("price", FieldType::Decimal).nullable(),
            Field::new("available", FieldType::Boolean),
            Field::new("tags", FieldType::Csv).nullable(),
            Field::new("extra", FieldType::Json).nullable(),
            Field::new("reviews", FieldType::Alias).required(),
        ]
    }

    fn details(err: SchemaError) -> ValidationDetails {
        err.details().cloned().unwrap()
    }

    // =========================================================================
    // Insert
    // =========================================================================

    #[test]
    fn test_valid_insert() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        let payload = json!({
            "title": "Dune",
            "rating": 4.5,
            "pages": 412,
            "isbn": "9780441013593",
            "price": "9.99",
            "available": true,
            "tags": ["scifi", "classic"],
            "extra": {"anything": [1, 2]}
        });
        assert!(v.validate_insert(&payload).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        let err = v.validate_insert(&json!({"pages": 10})).unwrap_err();
        let d = details(err);
        assert_eq!(d.field, "title");
        assert_eq!(d.actual, "missing");
    }

    #[test]
    fn test_required_with_default_may_be_omitted() {
        let mut fields = books();
        fields[1].default_value = Some(json!("Untitled"));
        let v = PayloadValidator::new("books", &fields);
        assert!(v.validate_insert(&json!({})).is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        let err = v
            .validate_insert(&json!({"title": "Dune", "author": "Herbert"}))
            .unwrap_err();
        assert_eq!(details(err).field, "author");
    }

    #[test]
    fn test_type_mismatch() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);

        let err = v.validate_insert(&json!({"title": "Dune", "pages": "many"})).unwrap_err();
        let d = details(err);
        assert_eq!(d.field, "pages");
        assert_eq!(d.expected, "integer");
        assert_eq!(d.actual, "string");

        assert!(v.validate_insert(&json!({"title": "Dune", "pages": 1.5})).is_err());
        assert!(v.validate_insert(&json!({"title": "Dune", "available": "yes"})).is_err());
        assert!(v.validate_insert(&json!({"title": "Dune", "isbn": "97x"})).is_err());
        assert!(v.validate_insert(&json!({"title": "Dune", "tags": [1, 2]})).is_err());
        assert!(v.validate_insert(&json!({"title": 42})).is_err());
    }

    #[test]
    fn test_null_only_when_nullable() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        assert!(v.validate_insert(&json!({"title": "Dune", "rating": null})).is_ok());
        let err = v.validate_insert(&json!({"title": null})).unwrap_err();
        assert_eq!(details(err).actual, "null");
    }

    #[test]
    fn test_max_length() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        assert!(v.validate_insert(&json!({"title": "a".repeat(20)})).is_ok());
        let err = v.validate_insert(&json!({"title": "a".repeat(21)})).unwrap_err();
        assert_eq!(details(err).expected, "at most 20 characters");
    }

    #[test]
    fn test_payload_must_be_object() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        let err = v.validate_insert(&json!([1, 2])).unwrap_err();
        assert_eq!(details(err).field, "$root");
    }

    // =========================================================================
    // Update
    // =========================================================================

    #[test]
    fn test_update_skips_required_check() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        assert!(v.validate_update(&json!({"rating": 3.0})).is_ok());
    }

    #[test]
    fn test_update_rejects_primary_key() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        let err = v.validate_update(&json!({"id": 7})).unwrap_err();
        assert_eq!(details(err).field, "id");
    }

    #[test]
    fn test_update_checks_types() {
        let fields = books();
        let v = PayloadValidator::new("books", &fields);
        assert!(v.validate_update(&json!({"available": 1})).is_err());
        assert!(v.validate_update(&json!({"nope": 1})).is_err());
    }

    #[test]
    fn test_unknown_types_accept_anything() {
        let fields = vec![Field::new("vector", FieldType::parse("tsvector"))];
        let v = PayloadValidator::new("docs", &fields);
        assert!(v.validate_insert(&json!({"vector": null})).is_ok());
        assert!(v.validate_insert(&json!({"vector": [1, "a"]})).is_ok());
    }
}
