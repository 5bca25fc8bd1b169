//! directus-client - A typed client for the Directus REST API
//!
//! Collections, items and files behind small façades, a query builder
//! that explains itself, and client-side payload validation against the
//! collection's fields.
//!
//! ```ignore
//! use directus_client::{field, Directus};
//!
//! let client = Directus::from_env().await?;
//! let books = client.collection("books").await?;
//! let query = books
//!     .query()
//!     .select(["title"])
//!     .filter(field("title").contains("Robots"))
//!     .sort_desc("rating")
//!     .limit(10);
//! let items = books.items().fetch(&query).await?;
//! ```

pub mod cli;
pub mod client;
pub mod collection;
pub mod errors;
pub mod files;
pub mod query;
pub mod schema;
pub mod session;

pub use client::Directus;
pub use collection::{Collection, CollectionMeta, Item, Items};
pub use errors::{Error, Result};
pub use files::{File, Folder, ImageFormat, Transform};
pub use query::{field, Condition, Explain, Filter, Operator, Query, SortKey};
pub use schema::{Field, FieldType, PayloadValidator};
pub use session::{ClientConfig, RetryPolicy, Session, Transport};
