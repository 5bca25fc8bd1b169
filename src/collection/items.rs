//! # Items
//!
//! Item reads and writes for one collection. Queries are checked against
//! the collection's fields and writes against its payload rules before any
//! request is sent.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::collection::Collection;
use crate::errors::{Error, Result};
use crate::query::{Query, QueryError};
use crate::session::Request;

/// A row of a collection
pub type Item = Map<String, Value>;

/// Item operations bound to a collection
pub struct Items<'a> {
    collection: &'a Collection,
}

impl<'a> Items<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Self { collection }
    }

    fn endpoint(&self) -> String {
        format!("items/{}", self.collection.name())
    }

    fn item_endpoint(&self, id: &dyn Display) -> String {
        format!("items/{}/{}", self.collection.name(), id)
    }

    fn check(&self, query: &Query) -> Result<()> {
        if query.collection() != self.collection.name() {
            return Err(QueryError::CollectionMismatch {
                expected: self.collection.name().to_string(),
                actual: query.collection().to_string(),
            }
            .into());
        }
        query.validate(self.collection.fields())?;
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Items matching a query
    pub async fn fetch(&self, query: &Query) -> Result<Vec<Item>> {
        self.check(query)?;
        let endpoint = self.endpoint();
        let resp = self
            .collection
            .transport()
            .send(Request::get(&endpoint).with_params(query.to_params()))
            .await?;

        let items = into_items(&endpoint, resp.data)?;
        debug!(
            collection = self.collection.name(),
            count = items.len(),
            duration_ms = resp.duration_ms,
            "Fetched items"
        );
        Ok(items)
    }

    /// Items matching a query, deserialized into `T`
    pub async fn fetch_as<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>> {
        self.fetch(query)
            .await?
            .into_iter()
            .map(|item| serde_json::from_value(Value::Object(item)).map_err(Error::from))
            .collect()
    }

    /// First item matching a query
    pub async fn first(&self, query: &Query) -> Result<Option<Item>> {
        let query = query.clone().limit(1);
        Ok(self.fetch(&query).await?.into_iter().next())
    }

    /// Number of items matching a query's filter and search
    pub async fn count(&self, query: &Query) -> Result<u64> {
        self.check(query)?;
        let endpoint = self.endpoint();
        let params: Vec<(String, String)> = query
            .to_params()
            .into_iter()
            .filter(|(k, _)| k == "filter" || k == "search")
            .chain([("aggregate[count]".to_string(), "*".to_string())])
            .collect();

        let resp = self
            .collection
            .transport()
            .send(Request::get(&endpoint).with_params(params))
            .await?;

        parse_count(&resp.data).ok_or_else(|| {
            Error::unexpected(&endpoint, format!("no count in {}", resp.data))
        })
    }

    /// One item by primary key
    pub async fn get(&self, id: impl Display) -> Result<Item> {
        let endpoint = self.item_endpoint(&id);
        let resp = self.collection.transport().get(&endpoint).await?;
        into_item(&endpoint, resp.data)
    }

    /// The item of a singleton collection
    pub async fn singleton(&self) -> Result<Item> {
        let endpoint = self.endpoint();
        let resp = self.collection.transport().get(&endpoint).await?;
        into_item(&endpoint, resp.data)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create an item; returns it as stored
    pub async fn insert(&self, payload: Value) -> Result<Item> {
        self.collection.validator().validate_insert(&payload)?;
        let endpoint = self.endpoint();
        let resp = self
            .collection
            .transport()
            .post(&endpoint, payload)
            .await?;
        debug!(collection = self.collection.name(), "Inserted item");
        into_item(&endpoint, resp.data)
    }

    /// Create several items in one request
    pub async fn insert_many(&self, payloads: Vec<Value>) -> Result<Vec<Item>> {
        let validator = self.collection.validator();
        for payload in &payloads {
            validator.validate_insert(payload)?;
        }
        let endpoint = self.endpoint();
        let count = payloads.len();
        let resp = self
            .collection
            .transport()
            .send(Request::post(&endpoint, Value::Array(payloads)))
            .await?;
        debug!(collection = self.collection.name(), count, "Inserted items");
        into_items(&endpoint, resp.data)
    }

    /// Patch an item; returns it as stored
    pub async fn update(&self, id: impl Display, patch: Value) -> Result<Item> {
        self.collection.validator().validate_update(&patch)?;
        let endpoint = self.item_endpoint(&id);
        let resp = self
            .collection
            .transport()
            .patch(&endpoint, patch)
            .await?;
        into_item(&endpoint, resp.data)
    }

    pub async fn delete(&self, id: impl Display) -> Result<()> {
        let endpoint = self.item_endpoint(&id);
        self.collection.transport().delete(&endpoint).await?;
        debug!(collection = self.collection.name(), id = %id, "Deleted item");
        Ok(())
    }

    /// Delete several items in one request
    pub async fn delete_many<I, K>(&self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: Into<Value>,
    {
        let keys: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Ok(());
        }
        let count = keys.len();
        self.collection
            .transport()
            .send(Request::delete(self.endpoint()).with_body(Value::Array(keys)))
            .await?;
        debug!(collection = self.collection.name(), count, "Deleted items");
        Ok(())
    }
}

/// Array payloads map to items; a singleton's object becomes one item
fn into_items(endpoint: &str, data: Value) -> Result<Vec<Item>> {
    match data {
        Value::Array(values) => values
            .into_iter()
            .map(|v| into_item(endpoint, v))
            .collect(),
        Value::Object(obj) => Ok(vec![obj]),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::unexpected(
            endpoint,
            format!("expected items, got {}", other),
        )),
    }
}

fn into_item(endpoint: &str, data: Value) -> Result<Item> {
    match data {
        Value::Object(obj) => Ok(obj),
        other => Err(Error::unexpected(
            endpoint,
            format!("expected an item, got {}", other),
        )),
    }
}

/// `[{"count": 42}]`; some databases report the count as a string
fn parse_count(data: &Value) -> Option<u64> {
    let count = match data {
        Value::Array(rows) => rows.first()?.get("count")?,
        Value::Object(obj) => obj.get("count")?,
        _ => return None,
    };
    match count {
        Value::Object(obj) => obj.values().next().and_then(parse_count_value),
        other => parse_count_value(other),
    }
}

fn parse_count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_items_shapes() {
        assert_eq!(into_items("e", json!([{"id": 1}, {"id": 2}])).unwrap().len(), 2);
        assert_eq!(into_items("e", json!({"id": 1})).unwrap().len(), 1);
        assert!(into_items("e", json!(null)).unwrap().is_empty());
        assert!(into_items("e", json!("nope")).is_err());
        assert!(into_items("e", json!([1])).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&json!([{"count": 42}])), Some(42));
        assert_eq!(parse_count(&json!([{"count": "7"}])), Some(7));
        assert_eq!(parse_count(&json!([{"count": {"*": 3}}])), Some(3));
        assert_eq!(parse_count(&json!([])), None);
        assert_eq!(parse_count(&json!("x")), None);
    }
}
