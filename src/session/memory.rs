//! # In-Memory Transport
//!
//! Serves canned payloads keyed by method and endpoint, and records every
//! request it receives. Useful for testing code built on the façades
//! without a running Directus instance.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::errors::{SessionError, SessionResult};
use super::response::{unwrap_envelope, ApiResponse};
use super::transport::{normalize_endpoint, FileUpload, Method, Request, Transport};

/// A request observed by the memory transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Multipart text fields and the uploaded filename, for uploads
    pub upload: Option<(Vec<(String, String)>, FileUpload)>,
}

impl RecordedRequest {
    /// Value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// In-memory transport for tests
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: RwLock<HashMap<(Method, String), Result<Value, (u16, String)>>>,
    assets: RwLock<HashMap<String, Vec<u8>>>,
    requests: RwLock<Vec<RecordedRequest>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method endpoint` with a payload.
    ///
    /// A `{"data": ...}` envelope is unwrapped like a real response, so raw
    /// recorded Directus bodies can be used directly.
    pub fn route(&self, method: Method, endpoint: &str, payload: Value) -> &Self {
        if let Ok(mut routes) = self.routes.write() {
            routes.insert(
                (method, normalize_endpoint(endpoint)),
                Ok(unwrap_envelope(payload)),
            );
        }
        self
    }

    /// Answer `method endpoint` with an HTTP error
    pub fn fail(&self, method: Method, endpoint: &str, status: u16, message: &str) -> &Self {
        if let Ok(mut routes) = self.routes.write() {
            routes.insert(
                (method, normalize_endpoint(endpoint)),
                Err((status, message.to_string())),
            );
        }
        self
    }

    /// Serve raw bytes for a download endpoint
    pub fn asset(&self, endpoint: &str, bytes: Vec<u8>) -> &Self {
        if let Ok(mut assets) = self.assets.write() {
            assets.insert(normalize_endpoint(endpoint), bytes);
        }
        self
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }

    /// Requests matching a method and endpoint
    pub fn requests_to(&self, method: Method, endpoint: &str) -> Vec<RecordedRequest> {
        let endpoint = normalize_endpoint(endpoint);
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.endpoint == endpoint)
            .collect()
    }

    fn record(&self, request: RecordedRequest) -> SessionResult<()> {
        let mut requests = self
            .requests
            .write()
            .map_err(|_| SessionError::Internal("Lock poisoned".into()))?;
        requests.push(request);
        Ok(())
    }

    fn lookup(&self, method: Method, endpoint: &str) -> SessionResult<Value> {
        let routes = self
            .routes
            .read()
            .map_err(|_| SessionError::Internal("Lock poisoned".into()))?;
        match routes.get(&(method, endpoint.to_string())) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err((status, message))) => Err(SessionError::status(*status, message.clone())),
            None => Err(SessionError::status(
                404,
                format!("no route for {} {}", method, endpoint),
            )),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: Request) -> SessionResult<ApiResponse> {
        self.record(RecordedRequest {
            method: request.method,
            endpoint: request.endpoint.clone(),
            params: request.params.clone(),
            body: request.body.clone(),
            upload: None,
        })?;
        let data = self.lookup(request.method, &request.endpoint)?;
        Ok(ApiResponse::new(200, 1, data))
    }

    async fn download(&self, endpoint: &str, params: &[(String, String)]) -> SessionResult<Vec<u8>> {
        let endpoint = normalize_endpoint(endpoint);
        self.record(RecordedRequest {
            method: Method::Get,
            endpoint: endpoint.clone(),
            params: params.to_vec(),
            body: None,
            upload: None,
        })?;
        let assets = self
            .assets
            .read()
            .map_err(|_| SessionError::Internal("Lock poisoned".into()))?;
        assets
            .get(&endpoint)
            .cloned()
            .ok_or_else(|| SessionError::status(404, format!("no asset at {}", endpoint)))
    }

    async fn upload(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
        file: FileUpload,
    ) -> SessionResult<ApiResponse> {
        let endpoint = normalize_endpoint(endpoint);
        self.record(RecordedRequest {
            method: Method::Post,
            endpoint: endpoint.clone(),
            params: Vec::new(),
            body: None,
            upload: Some((fields.to_vec(), file)),
        })?;
        let data = self.lookup(Method::Post, &endpoint)?;
        Ok(ApiResponse::new(200, 1, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_routes_and_records() {
        let transport = MemoryTransport::new();
        transport.route(Method::Get, "items/books", json!({"data": [{"id": 1}]}));

        let resp = transport
            .send(Request::get("/items/books").with_params([("limit", "1")]))
            .await
            .unwrap();
        assert_eq!(resp.data, json!([{"id": 1}]));

        let last = transport.last_request().unwrap();
        assert_eq!(last.endpoint, "items/books");
        assert_eq!(last.param("limit"), Some("1"));
    }

    #[tokio::test]
    async fn test_missing_route_is_404() {
        let transport = MemoryTransport::new();
        let err = transport.get("items/nothing").await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_failure_route() {
        let transport = MemoryTransport::new();
        transport.fail(Method::Get, "collections/secret", 403, "Forbidden");
        let err = transport.get("collections/secret").await.unwrap_err();
        assert_eq!(err.status_code(), Some(403));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_assets_and_uploads() {
        let transport = MemoryTransport::new();
        transport.asset("assets/abc", vec![1, 2, 3]);
        transport.route(Method::Post, "files", json!({"id": "abc"}));

        let bytes = transport.download("assets/abc", &[]).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);

        let fields = vec![("title".to_string(), "Cover".to_string())];
        transport
            .upload("files", &fields, FileUpload::new("cover.png", vec![9]))
            .await
            .unwrap();

        let uploads = transport.requests_to(Method::Post, "files");
        assert_eq!(uploads.len(), 1);
        let (sent_fields, file) = uploads[0].upload.clone().unwrap();
        assert_eq!(sent_fields, fields);
        assert_eq!(file.filename, "cover.png");
    }
}
