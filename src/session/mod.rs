//! # Session
//!
//! Thin HTTP transport over the Directus REST API:
//! - base url + bearer token
//! - request timeout
//! - retry with exponential backoff on transient failures
//! - `data` envelope unwrapping

pub mod config;
pub mod errors;
pub mod memory;
pub mod response;
pub mod retry;
pub mod session;
pub mod transport;

pub use config::ClientConfig;
pub use errors::{SessionError, SessionResult};
pub use memory::{MemoryTransport, RecordedRequest};
pub use response::ApiResponse;
pub use retry::RetryPolicy;
pub use session::{Session, HEALTH_ENDPOINT};
pub use transport::{FileUpload, Method, Request, Transport};
