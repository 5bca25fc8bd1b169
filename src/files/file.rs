//! # File Metadata
//!
//! See <https://docs.directus.io/reference/files.html#the-file-object>.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

const MIB: u64 = 1024 * 1024;
const KIB: u64 = 1024;

/// A file stored in Directus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: Uuid,
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub filename_disk: Option<String>,
    pub filename_download: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Mime type, e.g. `image/jpeg`
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub folder: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uploaded_by: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub uploaded_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_by: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub filesize: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub focal_point_x: Option<i64>,
    #[serde(default)]
    pub focal_point_y: Option<i64>,
    /// Audio/video duration in milliseconds
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Exif, IPTC and ICC data extracted on upload
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl File {
    /// Size for humans: whole MB from 1 MiB up, else whole KB
    pub fn pretty_filesize(&self) -> String {
        if self.filesize >= MIB {
            format!("{} MB", self.filesize / MIB)
        } else {
            format!("{} KB", self.filesize / KIB)
        }
    }

    /// Mime subtype, e.g. `jpeg` for `image/jpeg`
    pub fn subtype(&self) -> &str {
        self.mime_type
            .as_deref()
            .and_then(|m| m.split_once('/'))
            .map(|(_, sub)| sub)
            .unwrap_or("")
    }

    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"))
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<File {} ({})>", self.filename_download, self.pretty_filesize())
    }
}

/// Table of files: name, subtype, size, dimensions, upload date
pub fn files_table(files: &[File]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Name", "Type", "Size", "Width", "Height", "Uploaded"]);

    for file in files {
        table.add_row(vec![
            file.filename_download.clone(),
            file.subtype().to_string(),
            file.pretty_filesize(),
            file.width.map(|w| w.to_string()).unwrap_or_default(),
            file.height.map(|h| h.to_string()).unwrap_or_default(),
            file.uploaded_on
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ]);
    }

    table
}

/// RFC 3339, or a naive timestamp taken as UTC
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid filesize {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid filesize '{}'", s))),
        Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!("invalid filesize {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn cover() -> Value {
        json!({
            "id": "4f3e7c2a-9d3b-4a53-8d21-5b8f0c0e6d11",
            "storage": "local",
            "filename_disk": "4f3e7c2a-9d3b-4a53-8d21-5b8f0c0e6d11.jpg",
            "filename_download": "cover.jpg",
            "title": "Cover",
            "type": "image/jpeg",
            "folder": "0b7c8f61-2f0a-4c87-9a55-3c1f0b7f2a90",
            "created_on": "2024-03-01T10:15:30.000Z",
            "uploaded_by": null,
            "uploaded_on": "2024-03-01T10:15:31.123Z",
            "modified_by": null,
            "modified_on": "2024-03-02T08:00:00",
            "filesize": "2621440",
            "width": 800,
            "height": 1200,
            "focal_point_x": null,
            "focal_point_y": null,
            "duration": null,
            "description": null,
            "location": null,
            "tags": ["cover"],
            "metadata": {}
        })
    }

    #[test]
    fn test_parse_file() {
        let file: File = serde_json::from_value(cover()).unwrap();
        assert_eq!(file.filename_download, "cover.jpg");
        assert_eq!(file.filesize, 2_621_440);
        assert_eq!(file.width, Some(800));
        assert_eq!(file.subtype(), "jpeg");
        assert!(file.is_image());
        assert_eq!(file.tags, Some(vec!["cover".to_string()]));

        let created = file.created_on.unwrap();
        assert_eq!((created.year(), created.hour(), created.minute()), (2024, 10, 15));
        let modified = file.modified_on.unwrap();
        assert_eq!(modified.day(), 2);
    }

    #[test]
    fn test_numeric_filesize() {
        let mut value = cover();
        value["filesize"] = json!(2048);
        let file: File = serde_json::from_value(value).unwrap();
        assert_eq!(file.filesize, 2048);
        assert_eq!(file.pretty_filesize(), "2 KB");
    }

    #[test]
    fn test_pretty_filesize() {
        let mut file: File = serde_json::from_value(cover()).unwrap();
        assert_eq!(file.pretty_filesize(), "2 MB");
        file.filesize = MIB - 1;
        assert_eq!(file.pretty_filesize(), "1023 KB");
        file.filesize = 500;
        assert_eq!(file.pretty_filesize(), "0 KB");
        assert_eq!(file.to_string(), "<File cover.jpg (0 KB)>");
    }

    #[test]
    fn test_bad_filesize() {
        let mut value = cover();
        value["filesize"] = json!("big");
        assert!(serde_json::from_value::<File>(value).is_err());
    }

    #[test]
    fn test_non_image() {
        let mut value = cover();
        value["type"] = json!("text/plain");
        let file: File = serde_json::from_value(value).unwrap();
        assert!(!file.is_image());
        assert_eq!(file.subtype(), "plain");
    }

    #[test]
    fn test_files_table() {
        let file: File = serde_json::from_value(cover()).unwrap();
        let rendered = files_table(&[file]).to_string();
        assert!(rendered.contains("cover.jpg"));
        assert!(rendered.contains("2024-03-01"));
        assert!(rendered.contains("2 MB"));
    }
}
