//! Common types used across the client

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::Crop;

/// Reference to a locally readable leaf image.
///
/// Either a `file://` URI as handed out by camera/gallery pickers or a
/// plain filesystem path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to a filesystem path. Returns `None` for non-file schemes.
    pub fn to_path(&self) -> Option<PathBuf> {
        if let Some(rest) = self.0.strip_prefix("file://") {
            return Some(PathBuf::from(rest));
        }
        if self.0.contains("://") || self.0.trim().is_empty() {
            return None;
        }
        Some(PathBuf::from(&self.0))
    }

    /// Image format inferred from the extension, defaulting to JPEG
    pub fn format(&self) -> ImageFormat {
        let ext = self
            .0
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => ImageFormat::Png,
            Some("webp") => ImageFormat::Webp,
            _ => ImageFormat::Jpeg,
        }
    }

    /// Filename sent with the upload, e.g. `leaf_image_maize.jpg`
    pub fn upload_filename(&self, tag: &str) -> String {
        format!("leaf_image_{}.{}", tag, self.format().extension())
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Image encodings accepted by the inference service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }

    /// Detect the format from the leading magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xff, 0xd8]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, 0x50, 0x4e, 0x47]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(b"RIFF") {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }
}

/// Unit of confidence and probability values on the wire
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceUnit {
    /// 0.0 - 1.0; what the inference service sends unless told otherwise
    #[default]
    Fraction,
    /// 0 - 100
    Percent,
}

impl ConfidenceUnit {
    pub fn max(&self) -> f64 {
        match self {
            ConfidenceUnit::Fraction => 1.0,
            ConfidenceUnit::Percent => 100.0,
        }
    }

    /// Convert a value in this unit to a percentage rounded to two decimals
    pub fn to_percent(&self, value: f64) -> f64 {
        let pct = match self {
            ConfidenceUnit::Fraction => value * 100.0,
            ConfidenceUnit::Percent => value,
        };
        round_percent(pct)
    }
}

/// Round to two decimal places
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prediction request, created per scan and discarded after upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionRequest {
    pub crop: Crop,
    pub image: ImageRef,
}

impl PredictionRequest {
    pub fn new(crop: Crop, image: impl Into<ImageRef>) -> Self {
        Self {
            crop,
            image: image.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_uri_resolves_to_path() {
        let image = ImageRef::new("file:///data/photos/leaf.png");
        assert_eq!(image.to_path(), Some(PathBuf::from("/data/photos/leaf.png")));
    }

    #[test]
    fn test_remote_scheme_has_no_path() {
        assert_eq!(ImageRef::new("content://media/42").to_path(), None);
        assert_eq!(ImageRef::new("").to_path(), None);
    }

    #[test]
    fn test_format_from_extension_defaults_to_jpeg() {
        assert_eq!(ImageRef::new("leaf.PNG").format(), ImageFormat::Png);
        assert_eq!(ImageRef::new("a/b/leaf.webp").format(), ImageFormat::Webp);
        assert_eq!(ImageRef::new("leaf.jpeg").format(), ImageFormat::Jpeg);
        assert_eq!(ImageRef::new("file:///tmp/leaf").format(), ImageFormat::Jpeg);
        assert_eq!(ImageRef::new("/tmp/dir.png/leaf").format(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_upload_filename() {
        let image = ImageRef::new("file:///tmp/IMG_0001.png");
        assert_eq!(image.upload_filename("tomato"), "leaf_image_tomato.png");
    }

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(ImageFormat::sniff(&[0xff, 0xd8, 0xff, 0xe0]), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageFormat::sniff(&[0x89, b'P', b'N', b'G', 0x0d]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBP"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::sniff(b"GIF89a"), None);
    }

    #[test]
    fn test_fraction_to_percent() {
        assert_eq!(ConfidenceUnit::Fraction.to_percent(0.942), 94.2);
        assert_eq!(ConfidenceUnit::Percent.to_percent(94.2), 94.2);
        assert_eq!(ConfidenceUnit::Fraction.to_percent(0.1234), 12.34);
    }
}
