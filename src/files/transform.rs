//! Image transforms applied by the `assets/` endpoint

use std::fmt;
use std::str::FromStr;

use super::errors::{FileError, FileResult};

/// Output formats Directus can transcode images to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpg,
    Png,
    Webp,
    Avif,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Avif => "avif",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            "avif" => Ok(ImageFormat::Avif),
            _ => Err(FileError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resize and transcode options; the default downloads the original
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<ImageFormat>,
    /// 1 to 100
    pub quality: Option<u8>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// True when nothing is transformed
    pub fn is_identity(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.format.is_none() && self.quality.is_none()
    }

    pub fn validate(&self) -> FileResult<()> {
        if matches!(self.width, Some(0)) || matches!(self.height, Some(0)) {
            return Err(FileError::InvalidTransform(
                "width and height must be positive".into(),
            ));
        }
        if let Some(q) = self.quality {
            if !(1..=100).contains(&q) {
                return Err(FileError::InvalidTransform(format!(
                    "quality must be between 1 and 100, got {}",
                    q
                )));
            }
        }
        Ok(())
    }

    /// Asset query parameters; unset options are omitted
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(format) = self.format {
            params.push(("format".to_string(), format.to_string()));
        }
        if let Some(width) = self.width {
            params.push(("width".to_string(), width.to_string()));
        }
        if let Some(height) = self.height {
            params.push(("height".to_string(), height.to_string()));
        }
        if let Some(quality) = self.quality {
            params.push(("quality".to_string(), quality.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
        assert_eq!("WEBP".parse::<ImageFormat>().unwrap(), ImageFormat::Webp);
        assert!(matches!(
            "gif".parse::<ImageFormat>(),
            Err(FileError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_params_only_set_keys() {
        assert!(Transform::new().to_params().is_empty());
        assert!(Transform::new().is_identity());

        let t = Transform::new().width(200).format(ImageFormat::Png);
        assert_eq!(
            t.to_params(),
            vec![
                ("format".to_string(), "png".to_string()),
                ("width".to_string(), "200".to_string()),
            ]
        );
        assert!(!t.is_identity());
    }

    #[test]
    fn test_validate() {
        assert!(Transform::new().quality(80).validate().is_ok());
        assert!(Transform::new().quality(0).validate().is_err());
        assert!(Transform::new().quality(101).validate().is_err());
        assert!(Transform::new().width(0).validate().is_err());
    }
}
