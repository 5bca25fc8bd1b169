//! # Collection
//!
//! A collection's metadata and fields, loaded once, plus entry points to
//! its items and queries.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::items::Items;
use super::meta::{CollectionMeta, CollectionRecord};
use crate::errors::{Error, Result};
use crate::query::Query;
use crate::schema::{Field, FieldTable, PayloadValidator};
use crate::session::Transport;

/// A Directus collection
pub struct Collection {
    name: String,
    meta: CollectionMeta,
    fields: Vec<Field>,
    transport: Arc<dyn Transport>,
}

impl Collection {
    /// Load metadata from `collections/<name>` and fields from `fields/<name>`.
    ///
    /// Directus answers 403 for unknown collections; both 403 and 404 map
    /// to [`Error::CollectionNotFound`].
    pub async fn load(name: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let meta_endpoint = format!("collections/{}", name);
        let resp = transport.get(&meta_endpoint).await.map_err(|e| {
            if e.is_not_found() {
                Error::CollectionNotFound(name.to_string())
            } else {
                e.into()
            }
        })?;

        let record: CollectionRecord = serde_json::from_value(resp.data)
            .map_err(|e| Error::unexpected(&meta_endpoint, e.to_string()))?;
        let meta = record.into_meta();

        let fields_resp = transport.get(&format!("fields/{}", name)).await?;
        let fields = Field::list_from_value(&fields_resp.data)?;

        debug!(collection = name, fields = fields.len(), "Loaded collection");

        Ok(Self {
            name: name.to_string(),
            meta,
            fields,
            transport,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> &CollectionMeta {
        &self.meta
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_exists(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_primary_key)
    }

    pub fn field_table(&self) -> FieldTable<'_> {
        FieldTable::new(&self.fields)
    }

    /// A query bound to this collection
    pub fn query(&self) -> Query {
        Query::new(&self.name)
    }

    pub fn items(&self) -> Items<'_> {
        Items::new(self)
    }

    pub fn validator(&self) -> PayloadValidator<'_> {
        PayloadValidator::new(&self.name, &self.fields)
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .finish()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Collection {}>", self.name)
    }
}
