//! # File Errors

use thiserror::Error;

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

/// File and folder errors
#[derive(Debug, Error)]
pub enum FileError {
    // Remote lookups
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    // Transform errors
    #[error("Unsupported image format: {0} (supported: jpg, png, webp, avif)")]
    UnsupportedFormat(String),

    #[error("Resize and format transcoding is only available for images: {name} is {mime_type}")]
    NotAnImage { name: String, mime_type: String },

    #[error("Resize and format transcoding requires an on-disk filename")]
    FilenameRequired,

    #[error("Invalid transform: {0}")]
    InvalidTransform(String),

    /// On-disk name is not a single plain path component
    #[error("Invalid on-disk filename: {0:?}")]
    InvalidFilename(String),

    // Local filesystem
    #[error("Local file not found: {0}")]
    LocalFileNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FileError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FileError::FileNotFound(_)
                | FileError::FolderNotFound(_)
                | FileError::LocalFileNotFound(_)
        )
    }
}
