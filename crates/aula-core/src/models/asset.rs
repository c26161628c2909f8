use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Asset category derived from a declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Image,
    Document,
    Video,
    Unsupported,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Image => "image",
            AssetCategory::Document => "document",
            AssetCategory::Video => "video",
            AssetCategory::Unsupported => "unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AssetCategory::Unsupported)
    }
}

impl Display for AssetCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A file handed over by an upload surface.
#[derive(Debug, Clone)]
pub struct AssetFile {
    /// Original filename as chosen by the user (e.g. "foto.png")
    pub filename: String,
    /// Declared MIME type, possibly with parameters
    pub content_type: String,
    pub data: Bytes,
}

impl AssetFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lower-cased extension of the original filename, if it has a usable one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let file = AssetFile::new("Foto.PNG", "image/png", vec![1u8, 2, 3]);
        assert_eq!(file.extension().as_deref(), Some("png"));
        assert_eq!(file.size(), 3);
    }

    #[test]
    fn extension_missing_or_odd() {
        assert_eq!(AssetFile::new("README", "text/plain", vec![1u8]).extension(), None);
        assert_eq!(AssetFile::new("x.tar-gz", "application/zip", vec![1u8]).extension(), None);
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AssetCategory::Document).unwrap(),
            "\"document\""
        );
        assert!(!AssetCategory::Unsupported.is_supported());
    }
}
