//! Error types module
//!
//! `AssetError` is what the upload, delete and service entry points return.
//! `ValidationError` covers the shared pre-routing checks. Reference resolution
//! has no error type: it degrades to `None`.

use crate::conventions::AssetPurpose;
use crate::models::AssetCategory;
use crate::storage_types::ProviderId;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// to upload surfaces.
pub trait ErrorMetadata {
    /// HTTP status code a surface should answer with
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether the user can retry the same action
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Pre-routing validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("{category} files are not accepted for {purpose} uploads")]
    CategoryNotAllowed {
        category: AssetCategory,
        purpose: AssetPurpose,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Content type {content_type} does not match extension '{extension}' (expected one of: {expected})")]
    ContentTypeMismatch {
        content_type: String,
        extension: String,
        expected: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Unsupported asset type '{content_type}' for {purpose}")]
    Unsupported {
        content_type: String,
        purpose: AssetPurpose,
    },

    #[error("Upload to {provider} failed: {cause}")]
    UploadFailed { provider: ProviderId, cause: String },

    #[error("Delete from {provider} failed: {cause}")]
    DeleteFailed { provider: ProviderId, cause: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// (http_status, error_code, recoverable, log_level) for each variant.
fn asset_error_static_metadata(err: &AssetError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AssetError::Unsupported { .. } => (415, "UNSUPPORTED_ASSET", false, LogLevel::Debug),
        AssetError::UploadFailed { .. } => (502, "UPLOAD_FAILED", true, LogLevel::Error),
        AssetError::DeleteFailed { .. } => (502, "DELETE_FAILED", true, LogLevel::Warn),
        AssetError::Validation(ValidationError::FileTooLarge { .. }) => {
            (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug)
        }
        AssetError::Validation(_) => (400, "INVALID_ASSET", false, LogLevel::Debug),
        AssetError::Config(_) => (500, "CONFIGURATION_ERROR", false, LogLevel::Error),
    }
}

/// What a purpose accepts, phrased for end users.
fn accepted_description(purpose: AssetPurpose) -> &'static str {
    let accepts = purpose.convention().accepts;
    let images = accepts.contains(&AssetCategory::Image);
    let documents = accepts.contains(&AssetCategory::Document);
    let videos = accepts.contains(&AssetCategory::Video);

    match (images, documents, videos) {
        (true, false, false) => "Only images (JPG, PNG, GIF, WEBP) are allowed",
        (false, true, false) => {
            "Only documents (PDF, Word, Excel, PowerPoint, TXT, CSV, RTF, ZIP, RAR) are allowed"
        }
        _ => "Only images, documents or videos are allowed",
    }
}

impl ErrorMetadata for AssetError {
    fn http_status_code(&self) -> u16 {
        asset_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        asset_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        asset_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        asset_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AssetError::Unsupported { purpose, .. } => accepted_description(*purpose).to_string(),
            AssetError::UploadFailed { .. } => {
                "The file could not be uploaded. Please try again".to_string()
            }
            AssetError::DeleteFailed { .. } => "The previous file could not be removed".to_string(),
            AssetError::Validation(ValidationError::FileTooLarge { max, .. }) => {
                format!("The file must not exceed {} MB", max / (1024 * 1024))
            }
            AssetError::Validation(ValidationError::CategoryNotAllowed { purpose, .. }) => {
                accepted_description(*purpose).to_string()
            }
            AssetError::Validation(err) => err.to_string(),
            AssetError::Config(_) => "Storage is not configured".to_string(),
        }
    }
}

impl AssetError {
    /// Provider involved in the failure, if any
    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            AssetError::UploadFailed { provider, .. } | AssetError::DeleteFailed { provider, .. } => {
                Some(*provider)
            }
            _ => None,
        }
    }
}
