//! # Directus Client
//!
//! Entry point: connects a session, lists collections and folders, and
//! hands out collection and folder façades sharing one transport.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::collection::{Collection, CollectionRecord};
use crate::errors::{Error, Result};
use crate::files::{FileError, Folder};
use crate::session::{ClientConfig, Session, SessionError, Transport, HEALTH_ENDPOINT};

const COLLECTIONS_ENDPOINT: &str = "collections";
const SYSTEM_PREFIX: &str = "directus_";

/// A connected Directus client
#[derive(Clone)]
pub struct Directus {
    url: String,
    transport: Arc<dyn Transport>,
}

impl Directus {
    /// Build a session and check the server answers its health endpoint.
    ///
    /// Authentication is by static API token only.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let config = config.validate()?;
        let session = Session::new(&config)?;

        session.ping().await.map_err(|e| SessionError::Unreachable {
            url: config.url.clone(),
            token_hint: config.token_hint(),
            reason: e.to_string(),
        })?;

        info!(url = %config.url, "Connected to Directus");
        Ok(Self {
            url: config.url,
            transport: Arc::new(session),
        })
    }

    /// Connect using `.env` and the process environment
    pub async fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = ClientConfig::from_env()?;
        Self::connect(config).await
    }

    /// Wrap an existing transport without a health check
    pub fn with_transport(url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            url: url.into(),
            transport,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Health check round-trip in milliseconds
    pub async fn ping(&self) -> Result<u64> {
        Ok(self.transport.get(HEALTH_ENDPOINT).await?.duration_ms)
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Collection names; `directus_*` system collections only when asked
    pub async fn collection_names(&self, include_system: bool) -> Result<Vec<String>> {
        let resp = self.transport.get(COLLECTIONS_ENDPOINT).await?;
        let records: Vec<CollectionRecord> = serde_json::from_value(resp.data)
            .map_err(|e| Error::unexpected(COLLECTIONS_ENDPOINT, e.to_string()))?;

        Ok(records
            .into_iter()
            .map(|r| r.into_meta().collection)
            .filter(|name| include_system || !name.starts_with(SYSTEM_PREFIX))
            .collect())
    }

    pub async fn collection_exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .collection_names(true)
            .await?
            .iter()
            .any(|n| n == name))
    }

    /// Load a collection's metadata and fields
    pub async fn collection(&self, name: &str) -> Result<Collection> {
        Collection::load(name, self.transport()).await
    }

    /// Unwrapped payload of any endpoint, for debugging and fixture capture
    pub async fn raw_endpoint(&self, endpoint: &str) -> Result<Value> {
        Ok(self.transport.get(endpoint).await?.data)
    }

    // =========================================================================
    // Folders
    // =========================================================================

    pub async fn folders(&self) -> Result<Vec<Folder>> {
        Folder::list(self.transport()).await
    }

    /// First folder with this name
    pub async fn folder(&self, name: &str) -> Result<Folder> {
        self.folders()
            .await?
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| FileError::FolderNotFound(name.to_string()).into())
    }
}

impl std::fmt::Debug for Directus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directus").field("url", &self.url).finish()
    }
}
