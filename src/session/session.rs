//! # HTTP Session
//!
//! reqwest-backed transport: bearer token, timeout and retry policy.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::Url;

use super::config::ClientConfig;
use super::errors::{SessionError, SessionResult};
use super::response::{error_message, ApiResponse};
use super::retry::RetryPolicy;
use super::transport::{normalize_endpoint, FileUpload, Request, Transport};

/// Health endpoint used by [`Session::ping`]
pub const HEALTH_ENDPOINT: &str = "server/health";

/// Low-level requests to the Directus API
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl Session {
    /// Build a session from a config.
    ///
    /// The config is validated first: the url must be http(s) and the token non-empty.
    pub fn new(config: &ClientConfig) -> SessionResult<Self> {
        let config = config.validate()?;

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| SessionError::Config(format!("invalid API token: {}", e)))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| SessionError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            url = %config.url,
            timeout_secs = config.timeout_secs,
            max_attempts = config.retry.max_attempts,
            "Directus session initialized"
        );

        Ok(Self {
            client,
            base_url: config.url,
            retry: config.retry,
        })
    }

    /// Base url without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retry policy in use
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Check that the API is reachable.
    ///
    /// Returns the round-trip duration in milliseconds (at least 1).
    pub async fn ping(&self) -> SessionResult<u64> {
        let response = self.send(Request::get(HEALTH_ENDPOINT)).await?;
        tracing::info!(duration_ms = response.duration_ms, "Server up");
        Ok(response.duration_ms)
    }

    /// Build `{base_url}/{endpoint}?{params}`
    pub fn url(&self, endpoint: &str, params: &[(String, String)]) -> SessionResult<Url> {
        let raw = format!("{}/{}", self.base_url, normalize_endpoint(endpoint));
        let mut url = Url::parse(&raw)
            .map_err(|e| SessionError::InvalidRequest(format!("invalid url {}: {}", raw, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    async fn send_once(&self, request: &Request, url: &Url) -> SessionResult<ApiResponse> {
        let start = Instant::now();

        let mut builder = self.client.request(request.method.into(), url.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(SessionError::status(
                status.as_u16(),
                error_message(&String::from_utf8_lossy(&body)),
            ));
        }

        let parsed = ApiResponse::from_body(status.as_u16(), duration_ms, &body)?;
        tracing::debug!(
            method = %request.method,
            url = %url,
            status = status.as_u16(),
            records = parsed.len(),
            duration_ms = parsed.duration_ms,
            "Directus request succeeded"
        );
        Ok(parsed)
    }

    async fn download_once(&self, url: &Url) -> SessionResult<Vec<u8>> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(SessionError::status(
                status.as_u16(),
                error_message(&String::from_utf8_lossy(&body)),
            ));
        }
        Ok(body.to_vec())
    }

    async fn upload_once(
        &self,
        url: &Url,
        fields: &[(String, String)],
        file: &FileUpload,
    ) -> SessionResult<ApiResponse> {
        let start = Instant::now();

        // Directus reads metadata fields only when they precede the file part
        let mut form = Form::new();
        for (key, value) in fields {
            form = form.text(key.clone(), value.clone());
        }
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| SessionError::InvalidRequest(format!("invalid mime type: {}", e)))?;
        form = form.part("file", part);

        let response = self.client.post(url.clone()).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(SessionError::status(
                status.as_u16(),
                error_message(&String::from_utf8_lossy(&body)),
            ));
        }
        ApiResponse::from_body(status.as_u16(), duration_ms, &body)
    }
}

#[async_trait]
impl Transport for Session {
    async fn send(&self, request: Request) -> SessionResult<ApiResponse> {
        let url = self.url(&request.endpoint, &request.params)?;
        tracing::debug!(method = %request.method, url = %url, "Directus request");

        self.retry
            .run(|| self.send_once(&request, &url))
            .await
            .map_err(|e| {
                tracing::error!(method = %request.method, url = %url, error = %e, "Directus request failed");
                e
            })
    }

    async fn download(&self, endpoint: &str, params: &[(String, String)]) -> SessionResult<Vec<u8>> {
        let url = self.url(endpoint, params)?;
        tracing::debug!(url = %url, "Directus download");

        let bytes = self
            .retry
            .run(|| self.download_once(&url))
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Directus download failed");
                e
            })?;
        tracing::debug!(url = %url, bytes = bytes.len(), "Directus download complete");
        Ok(bytes)
    }

    async fn upload(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
        file: FileUpload,
    ) -> SessionResult<ApiResponse> {
        let url = self.url(endpoint, &[])?;
        tracing::debug!(url = %url, filename = %file.filename, bytes = file.bytes.len(), "Directus upload");

        self.retry
            .run(|| self.upload_once(&url, fields, &file))
            .await
            .map_err(|e| {
                tracing::error!(url = %url, filename = %file.filename, error = %e, "Directus upload failed");
                e
            })
    }
}
