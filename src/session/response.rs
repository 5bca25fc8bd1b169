//! # API Responses
//!
//! Directus wraps payloads as `{"data": ...}` and failures as
//! `{"errors": [{"message": ...}]}`.

use serde_json::Value;

use super::errors::{SessionError, SessionResult};

/// A successful API response with the `data` envelope removed
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Round-trip duration in milliseconds (never 0)
    pub duration_ms: u64,
    /// Unwrapped payload; `Null` for empty bodies
    pub data: Value,
}

impl ApiResponse {
    /// Build a response from an already unwrapped payload
    pub fn new(status: u16, duration_ms: u64, data: Value) -> Self {
        Self {
            status,
            duration_ms: duration_ms.max(1),
            data,
        }
    }

    /// Parse a raw body, unwrapping the `data` envelope
    pub fn from_body(status: u16, duration_ms: u64, body: &[u8]) -> SessionResult<Self> {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::new(status, duration_ms, Value::Null));
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|e| SessionError::Decode(e.to_string()))?;
        Ok(Self::new(status, duration_ms, unwrap_envelope(value)))
    }

    /// Number of records carried (array length, 1 for an object, 0 for null)
    pub fn len(&self) -> usize {
        match &self.data {
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Return `data` when the body is an object carrying it, else the body itself
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Extract a readable message from an error body
pub fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("errors")?
            .as_array()?
            .first()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    });

    match message {
        Some(m) => m,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwraps_data_envelope() {
        let resp = ApiResponse::from_body(200, 12, br#"{"data": [{"id": 1}, {"id": 2}]}"#).unwrap();
        assert_eq!(resp.data, json!([{"id": 1}, {"id": 2}]));
        assert_eq!(resp.len(), 2);
    }

    #[test]
    fn test_passes_through_bare_body() {
        let resp = ApiResponse::from_body(200, 3, br#"{"status": "ok"}"#).unwrap();
        assert_eq!(resp.data, json!({"status": "ok"}));
        assert_eq!(resp.len(), 1);
    }

    #[test]
    fn test_empty_body_is_null() {
        let resp = ApiResponse::from_body(204, 0, b"").unwrap();
        assert_eq!(resp.data, Value::Null);
        assert!(resp.is_empty());
        assert_eq!(resp.duration_ms, 1);
    }

    #[test]
    fn test_invalid_json() {
        let err = ApiResponse::from_body(200, 1, b"<html>").unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"errors": [{"message": "You don't have permission to access this.", "extensions": {"code": "FORBIDDEN"}}]}"#;
        assert_eq!(error_message(body), "You don't have permission to access this.");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
        assert_eq!(error_message(""), "empty response body");
    }
}
