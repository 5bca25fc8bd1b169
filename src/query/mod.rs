//! # Query
//!
//! Builder for Directus items queries.
//!
//! ```ignore
//! let q = Query::new("books")
//!     .select(["title"])
//!     .filter(field("title").contains("Robots"))
//!     .sort_desc("rating")
//!     .limit(10);
//! println!("{}", q.explain());
//! ```

mod builder;
mod errors;
mod explain;
mod filter;
mod operator;

pub use builder::{Query, SortDirection, SortKey};
pub use errors::{QueryError, QueryResult};
pub use explain::Explain;
pub use filter::{field, Condition, Filter};
pub use operator::{Logic, Operator, OperatorKind};
