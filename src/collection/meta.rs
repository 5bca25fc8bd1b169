//! Collection metadata as returned by `collections/<name>`
//!
//! See <https://docs.directus.io/reference/system/collections.html#the-collection-object>.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The `meta` block of a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionMeta {
    pub collection: String,
    pub icon: Option<String>,
    pub note: Option<String>,
    pub display_template: Option<String>,
    #[serde(deserialize_with = "null_as_false")]
    pub hidden: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub singleton: bool,
    pub translations: Option<Value>,
    pub archive_field: Option<String>,
    #[serde(deserialize_with = "null_as_false")]
    pub archive_app_filter: bool,
    pub archive_value: Option<String>,
    pub unarchive_value: Option<String>,
    pub sort_field: Option<String>,
    /// `all`, `activity` or null
    pub accountability: Option<String>,
    pub color: Option<String>,
    pub item_duplication_fields: Option<Value>,
    pub sort: Option<i64>,
    /// Parent collection in the data model tree
    pub group: Option<String>,
    pub collapse: Option<String>,
    pub preview_url: Option<String>,
    #[serde(deserialize_with = "null_as_false")]
    pub versioning: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Payload of `collections/<name>`; folders and unmanaged tables have no `meta`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CollectionRecord {
    pub collection: String,
    #[serde(default)]
    pub meta: Option<CollectionMeta>,
}

impl CollectionRecord {
    pub fn into_meta(self) -> CollectionMeta {
        let name = self.collection;
        let mut meta = self.meta.unwrap_or_default();
        if meta.collection.is_empty() {
            meta.collection = name;
        }
        meta
    }
}
