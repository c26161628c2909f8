//! Mock storage implementation for testing

use crate::keys::{generate_storage_key, key_from_reference, validate_key};
use crate::traits::{AssetStore, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use aula_core::ProviderId;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock storage that keeps objects in memory and records every backend call
#[derive(Clone)]
pub struct MockStorage {
    provider: ProviderId,
    base_url: String,
    files: Arc<Mutex<HashMap<String, Bytes>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail_uploads: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl MockStorage {
    pub fn new(provider: ProviderId, base_url: impl Into<String>) -> Self {
        Self {
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            files: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_uploads: Arc::new(AtomicBool::new(false)),
            fail_deletes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mock CDN at `https://cdn.example.edu`
    pub fn cdn() -> Self {
        Self::new(ProviderId::Cdn, "https://cdn.example.edu")
    }

    /// Mock local store at `http://localhost:3000/uploads`
    pub fn local() -> Self {
        Self::new(ProviderId::LocalStore, "http://localhost:3000/uploads")
    }

    /// Make every following upload fail
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every following delete fail
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Set a file in the mock storage
    pub fn set_file(&self, key: &str, data: impl Into<Bytes>) {
        self.files
            .lock()
            .unwrap()
            .insert(key.to_string(), data.into());
    }

    /// Check if a file exists in the mock storage
    pub fn has_file(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    /// Every backend call so far, as `"upload:{key}"`, `"delete:{key}"` or `"exists:{key}"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Keys passed to `delete`, in call order
    pub fn deleted_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix("delete:").map(str::to_string))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AssetStore for MockStorage {
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject> {
        let key = generate_storage_key(folder, filename);
        self.record(format!("upload:{}", key));

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("mock upload failure".to_string()));
        }
        validate_key(&key)?;

        self.files.lock().unwrap().insert(key.clone(), data);
        Ok(StoredObject {
            url: self.public_url(&key),
            key,
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.record(format!("delete:{}", key));

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("mock delete failure".to_string()));
        }

        self.files.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.record(format!("exists:{}", key));
        Ok(self.has_file(key))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn object_key(&self, reference: &str) -> Option<String> {
        key_from_reference(&self.base_url, reference)
    }

    fn provider(&self) -> ProviderId {
        self.provider
    }
}
