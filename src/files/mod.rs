//! # Files
//!
//! Folder and file façades over `folders/`, `files/` and `assets/`.

mod errors;
mod file;
mod folder;
mod transform;

pub use errors::{FileError, FileResult};
pub use file::{files_table, File};
pub use folder::Folder;
pub use transform::{ImageFormat, Transform};
