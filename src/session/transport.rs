//! # Transport
//!
//! The seam between the façades and the wire. [`Session`](super::Session)
//! talks HTTP; [`MemoryTransport`](super::MemoryTransport) serves canned
//! payloads for tests.

use async_trait::async_trait;
use serde_json::Value;

use super::errors::SessionResult;
use super::response::ApiResponse;

/// HTTP methods used against the Directus API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request against an API endpoint relative to the base url
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Endpoint path without leading slash, e.g. `items/books`
    pub endpoint: String,
    /// Query string parameters, in order
    pub params: Vec<(String, String)>,
    /// Optional JSON body
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            method,
            endpoint: normalize_endpoint(&endpoint),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, endpoint).with_body(body)
    }

    pub fn patch(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Patch, endpoint).with_body(body)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    /// Append query parameters
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A file part for multipart uploads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Create an upload, guessing the mime type from the filename
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string();
        Self {
            filename,
            mime_type,
            bytes,
        }
    }
}

/// Strip leading slashes so `"/items/x"` and `"items/x"` address the same endpoint
pub fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim_start_matches('/').to_string()
}

/// Transport used by every façade
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a JSON request and return the unwrapped `data` payload
    async fn send(&self, request: Request) -> SessionResult<ApiResponse>;

    /// Fetch raw bytes (asset downloads)
    async fn download(&self, endpoint: &str, params: &[(String, String)]) -> SessionResult<Vec<u8>>;

    /// Multipart upload; text fields are sent before the file part
    async fn upload(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
        file: FileUpload,
    ) -> SessionResult<ApiResponse>;

    /// GET convenience
    async fn get(&self, endpoint: &str) -> SessionResult<ApiResponse> {
        self.send(Request::get(endpoint)).await
    }

    async fn post(&self, endpoint: &str, body: Value) -> SessionResult<ApiResponse> {
        self.send(Request::post(endpoint, body)).await
    }

    async fn patch(&self, endpoint: &str, body: Value) -> SessionResult<ApiResponse> {
        self.send(Request::patch(endpoint, body)).await
    }

    async fn delete(&self, endpoint: &str) -> SessionResult<ApiResponse> {
        self.send(Request::delete(endpoint)).await
    }
}
