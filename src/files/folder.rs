//! # Folder
//!
//! File operations scoped to one Directus folder: listing, lookup by
//! download name, asset download with optional image transforms, multipart
//! upload and deletion.
//!
//! See <https://docs.directus.io/reference/system/folders.html>.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use comfy_table::Table;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use super::errors::FileError;
use super::file::{files_table, File};
use super::transform::Transform;
use crate::errors::{Error, Result};
use crate::query::{field, Query};
use crate::session::{FileUpload, Request, Transport};

const FILES_ENDPOINT: &str = "files";
const FOLDERS_ENDPOINT: &str = "folders";

/// Payload of a folder record
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FolderRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub parent: Option<Uuid>,
}

/// A Directus folder
#[derive(Clone)]
pub struct Folder {
    id: Uuid,
    name: String,
    parent: Option<Uuid>,
    transport: Arc<dyn Transport>,
}

impl Folder {
    pub(crate) fn from_record(record: FolderRecord, transport: Arc<dyn Transport>) -> Self {
        Self {
            id: record.id,
            name: record.name,
            parent: record.parent,
            transport,
        }
    }

    /// Every folder visible to the token
    pub(crate) async fn list(transport: Arc<dyn Transport>) -> Result<Vec<Folder>> {
        let resp = transport.get(FOLDERS_ENDPOINT).await?;
        let records: Vec<FolderRecord> = serde_json::from_value(resp.data)
            .map_err(|e| Error::unexpected(FOLDERS_ENDPOINT, e.to_string()))?;
        Ok(records
            .into_iter()
            .map(|r| Folder::from_record(r, Arc::clone(&transport)))
            .collect())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<Uuid> {
        self.parent
    }

    /// Create a subfolder
    pub async fn create_folder(&self, name: &str) -> Result<Folder> {
        let body = json!({"name": name, "parent": self.id});
        let resp = self
            .transport
            .post(FOLDERS_ENDPOINT, body)
            .await?;
        let record: FolderRecord = serde_json::from_value(resp.data)
            .map_err(|e| Error::unexpected(FOLDERS_ENDPOINT, e.to_string()))?;
        info!(folder = %self.name, subfolder = name, "Created folder");
        Ok(Folder::from_record(record, Arc::clone(&self.transport)))
    }

    // =========================================================================
    // Listing
    // =========================================================================

    fn files_query(&self) -> Query {
        Query::new(FILES_ENDPOINT)
            .select(["*"])
            .filter(field("folder").eq(self.id.to_string()))
    }

    async fn fetch_files(&self, query: Query) -> Result<Vec<File>> {
        let resp = self
            .transport
            .send(Request::get(FILES_ENDPOINT).with_params(query.to_params()))
            .await?;
        let files: Vec<File> = match resp.data {
            Value::Null => Vec::new(),
            data => serde_json::from_value(data)
                .map_err(|e| Error::unexpected(FILES_ENDPOINT, e.to_string()))?,
        };
        Ok(files)
    }

    /// Files in this folder, up to `limit` when given
    pub async fn files(&self, limit: Option<u64>) -> Result<Vec<File>> {
        let mut query = self.files_query();
        if let Some(limit) = limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        self.fetch_files(query).await
    }

    /// Download names of every file in the folder
    pub async fn filenames(&self) -> Result<Vec<String>> {
        Ok(self
            .files(None)
            .await?
            .into_iter()
            .map(|f| f.filename_download)
            .collect())
    }

    /// A file by its download name
    pub async fn file_info(&self, name: &str) -> Result<Option<File>> {
        let query = self
            .files_query()
            .filter(field("filename_download").eq(name))
            .limit(1);
        Ok(self.fetch_files(query).await?.into_iter().next())
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.file_info(name).await?.is_some())
    }

    async fn resolve(&self, name: &str) -> Result<File> {
        self.file_info(name)
            .await?
            .ok_or_else(|| FileError::FileNotFound(name.to_string()).into())
    }

    /// Table of the folder's files
    pub async fn files_table(&self, limit: Option<u64>) -> Result<Table> {
        Ok(files_table(&self.files(limit).await?))
    }

    // =========================================================================
    // Download
    // =========================================================================

    async fn fetch_asset(&self, file: &File, transform: &Transform) -> Result<Vec<u8>> {
        if !transform.is_identity() && !file.is_image() {
            return Err(FileError::NotAnImage {
                name: file.filename_download.clone(),
                mime_type: file.mime_type.clone().unwrap_or_default(),
            }
            .into());
        }

        let endpoint = format!("assets/{}", file.id);
        debug!(file = %file.filename_download, endpoint = %endpoint, "Downloading asset");
        Ok(self
            .transport
            .download(&endpoint, &transform.to_params())
            .await?)
    }

    /// Raw bytes of a file, optionally resized or transcoded
    pub async fn download_bytes(&self, name: &str, transform: &Transform) -> Result<Vec<u8>> {
        transform.validate()?;
        let file = self.resolve(name).await?;
        self.fetch_asset(&file, transform).await
    }

    /// Write a file into `dir`, creating it when missing.
    ///
    /// The on-disk name defaults to the download name; transforms require
    /// an explicit one. Returns the written path.
    pub async fn download(
        &self,
        name: &str,
        dir: impl AsRef<Path>,
        ondisk_filename: Option<&str>,
        transform: &Transform,
    ) -> Result<PathBuf> {
        transform.validate()?;
        if !transform.is_identity() && ondisk_filename.is_none() {
            return Err(FileError::FilenameRequired.into());
        }

        if let Some(ondisk) = ondisk_filename {
            check_filename(ondisk)?;
        }

        let file = self.resolve(name).await?;
        let ondisk = ondisk_filename.unwrap_or(&file.filename_download);
        check_filename(ondisk)?;
        let bytes = self.fetch_asset(&file, transform).await?;

        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(FileError::from)?;
        let path = dir.join(ondisk);
        tokio::fs::write(&path, &bytes).await.map_err(FileError::from)?;

        info!(file = name, path = %path.display(), bytes = bytes.len(), "Downloaded file");
        Ok(path)
    }

    // =========================================================================
    // Upload / delete
    // =========================================================================

    /// Upload a local file.
    ///
    /// `filename` defaults to the path's file name, `title` to its stem.
    pub async fn upload(
        &self,
        path: impl AsRef<Path>,
        filename: Option<&str>,
        title: Option<&str>,
    ) -> Result<File> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FileError::LocalFileNotFound(path.display().to_string()).into());
        }
        let bytes = tokio::fs::read(path).await.map_err(FileError::from)?;

        let filename = match filename {
            Some(f) => f.to_string(),
            None => os_str(path.file_name()),
        };
        let title = match title {
            Some(t) => t.to_string(),
            None => os_str(path.file_stem()),
        };

        self.upload_bytes(bytes, &filename, Some(&title)).await
    }

    /// Upload bytes as a file; `title` defaults to the filename
    pub async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        title: Option<&str>,
    ) -> Result<File> {
        let fields = vec![
            ("folder".to_string(), self.id.to_string()),
            ("title".to_string(), title.unwrap_or(filename).to_string()),
        ];
        let size = bytes.len();
        let resp = self
            .transport
            .upload(FILES_ENDPOINT, &fields, FileUpload::new(filename, bytes))
            .await?;

        let file: File = serde_json::from_value(resp.data)
            .map_err(|e| Error::unexpected(FILES_ENDPOINT, e.to_string()))?;
        info!(folder = %self.name, file = filename, bytes = size, "Uploaded file");
        Ok(file)
    }

    /// Delete files by download name; returns how many were deleted.
    ///
    /// Every name is resolved first and nothing is deleted if one is missing.
    pub async fn delete<I, S>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids = Vec::new();
        for name in names {
            let file = self.resolve(name.as_ref()).await?;
            ids.push(Value::String(file.id.to_string()));
        }
        if ids.is_empty() {
            return Ok(0);
        }

        let count = ids.len();
        self.transport
            .send(Request::delete(FILES_ENDPOINT).with_body(Value::Array(ids)))
            .await?;
        info!(folder = %self.name, count, "Deleted files");
        Ok(count)
    }
}

/// A download target must stay inside the target directory
fn check_filename(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(FileError::InvalidFilename(name.to_string()).into()),
    }
}

fn os_str(part: Option<&std::ffi::OsStr>) -> String {
    part.map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl fmt::Debug for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Folder")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .finish()
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Folder {}>", self.name)
    }
}
