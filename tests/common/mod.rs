//! Shared helpers for integration tests
//!
//! Fixtures under `tests/fixtures/` are raw Directus bodies, as written by
//! `directus dump`.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use directus_client::session::{MemoryTransport, Method};
use directus_client::Directus;
use serde_json::Value;

pub const BASE_URL: &str = "http://localhost:8055";
pub const COVERS_ID: &str = "0b7c8f61-2f0a-4c87-9a55-3c1f0b7f2a90";
pub const COVER_FILE_ID: &str = "4a1f1c52-7d2b-4e3a-9f0c-5b6d7e8f9a01";

pub fn fixture_path(endpoint: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.json", endpoint))
}

pub fn fixture(endpoint: &str) -> Value {
    let raw = std::fs::read_to_string(fixture_path(endpoint)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

/// Memory transport answering every fixture endpoint with GET
pub fn transport() -> Arc<MemoryTransport> {
    let t = Arc::new(MemoryTransport::new());
    for endpoint in [
        "collections",
        "collections/books",
        "fields/books",
        "items/books",
        "folders",
        "files",
    ] {
        t.route(Method::Get, endpoint, fixture(endpoint));
    }
    t.route(Method::Get, "server/health", serde_json::json!({"status": "ok"}));
    t
}

pub fn client() -> (Directus, Arc<MemoryTransport>) {
    let t = transport();
    (Directus::with_transport(BASE_URL, t.clone()), t)
}
