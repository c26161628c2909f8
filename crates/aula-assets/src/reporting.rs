//! Failure logging at the level each error declares for itself.

use aula_core::{AssetError, ErrorMetadata, LogLevel};

/// Log `err` for the object or file it concerns.
pub fn log_error(err: &AssetError, object: &str) {
    let code = err.error_code();
    let provider = err.provider().map(|p| p.as_str());
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(
                error = %err,
                code = code,
                provider = ?provider,
                object = %object,
                "Asset operation failed"
            );
        }
        LogLevel::Warn => {
            tracing::warn!(
                error = %err,
                code = code,
                provider = ?provider,
                object = %object,
                "Asset operation failed"
            );
        }
        LogLevel::Error => {
            tracing::error!(
                error = %err,
                code = code,
                provider = ?provider,
                object = %object,
                "Asset operation failed"
            );
        }
    }
}
