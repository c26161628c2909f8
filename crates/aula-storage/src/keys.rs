//! Shared key handling for storage backends.
//!
//! Key format: `{folder}/{filename}`, or just `{filename}` at the store root.

use aula_core::urls::{is_absolute_url, without_query, without_scheme};

use crate::traits::{StorageError, StorageResult};

/// Generate a storage key for the given folder and filename.
pub(crate) fn generate_storage_key(folder: &str, filename: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", folder, filename)
    }
}

/// Reject keys that could escape the store or address nothing.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.ends_with('/') {
        return Err(StorageError::InvalidKey(format!("Empty object name in '{}'", key)));
    }

    if key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment == ".." || segment.is_empty())
        || key.chars().any(char::is_control)
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

/// Map a stored reference to a key below `base_url`.
///
/// Scheme differences (http vs https, protocol-relative) are ignored. URLs
/// and relative references are percent-decoded exactly once, so every shape
/// of one reference maps to the same key.
pub(crate) fn key_from_reference(base_url: &str, reference: &str) -> Option<String> {
    let reference = without_query(reference.trim());
    if reference.is_empty() {
        return None;
    }

    let path = if is_absolute_url(reference) {
        let base = without_scheme(base_url.trim_end_matches('/'));
        without_scheme(reference).strip_prefix(base)?.strip_prefix('/')?
    } else {
        reference.trim_start_matches('/')
    };

    let key = urlencoding::decode(path).ok()?.into_owned();
    validate_key(&key).ok()?;
    Some(key)
}
