use std::path::Path;

use anyhow::Context;
use aula_core::{AssetError, AssetFile, ErrorMetadata, ProviderId};
use serde::Serialize;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// JSON body printed when an asset operation fails
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderId>,
}

impl From<&AssetError> for ErrorResponse {
    fn from(err: &AssetError) -> Self {
        Self {
            error: err.client_message(),
            code: err.error_code(),
            status: err.http_status_code(),
            recoverable: err.is_recoverable(),
            provider: err.provider(),
        }
    }
}

/// Content type of a local file: the explicit one if given, else guessed from
/// the extension, else `application/octet-stream`.
pub fn content_type_for(path: &Path, explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| mime_guess::from_path(path).first().map(|m| m.to_string()))
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// Read a file from disk as an upload.
pub async fn read_asset_file(path: &Path, content_type: Option<&str>) -> anyhow::Result<AssetFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("No usable filename in {}", path.display()))?;

    Ok(AssetFile::new(
        filename,
        content_type_for(path, content_type),
        data,
    ))
}
