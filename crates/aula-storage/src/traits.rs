//! Storage abstraction trait
//!
//! This module defines the AssetStore trait that both backends implement.

use aula_core::ProviderId;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object written by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Backend-relative key (`{folder}/{filename}`)
    pub key: String,
    /// Absolute public URL of the object
    pub url: String,
}

/// Storage abstraction trait
///
/// The CDN object store and the application-local file store both implement
/// this trait, so the router and the deletion coordinator never depend on a
/// concrete backend.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `data` under `{folder}/{filename}`
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject>;

    /// Delete an object by key. Deleting a missing object succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL of the object stored under `key`
    fn public_url(&self, key: &str) -> String;

    /// Key addressed by a stored reference.
    ///
    /// An absolute URL under this backend's public base yields the key below
    /// it, a relative reference is taken as a key, and a URL served from
    /// anywhere else yields `None`.
    fn object_key(&self, reference: &str) -> Option<String>;

    /// Which provider this backend is
    fn provider(&self) -> ProviderId;
}
