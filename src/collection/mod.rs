//! # Collection
//!
//! Façades over `collections/`, `fields/` and `items/` endpoints.

mod collection;
mod items;
mod meta;

pub use collection::Collection;
pub use items::{Item, Items};
pub use meta::CollectionMeta;
pub(crate) use meta::CollectionRecord;
