//! # Schema
//!
//! Field metadata for Directus collections and client-side payload checks.
//!
//! Fields come from `fields/<collection>`. Writes are validated against
//! them before any request leaves the client, so a bad payload never
//! reaches the server.

mod errors;
mod field;
mod table;
mod types;
mod validator;

pub use errors::{json_type_name, SchemaError, SchemaResult, ValidationDetails};
pub use field::Field;
pub use table::FieldTable;
pub use types::{FieldType, ValueKind};
pub use validator::PayloadValidator;
