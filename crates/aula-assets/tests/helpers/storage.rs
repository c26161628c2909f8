use std::path::PathBuf;
use std::sync::Arc;

use aula_assets::{AssetService, ServiceSettings};
use aula_core::UploadLimits;
use aula_storage::{AssetStore, CdnStorage, LocalStorage};
use object_store::memory::InMemory;
use tempfile::TempDir;

pub const CDN_BASE_URL: &str = "https://cdn.example.edu";
pub const LOCAL_BASE_URL: &str = "http://localhost:3000/uploads";

/// Service over an in-memory CDN bucket and a temporary local store.
pub struct TestStorage {
    pub temp_dir: TempDir,
    pub base_path: PathBuf,
    pub cdn: Arc<dyn AssetStore>,
    pub local: Arc<dyn AssetStore>,
    pub service: AssetService,
}

impl TestStorage {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let base_path = temp_dir.path().join("uploads");

        let cdn: Arc<dyn AssetStore> = Arc::new(CdnStorage::with_store(
            Arc::new(InMemory::new()),
            CDN_BASE_URL,
        ));
        let local: Arc<dyn AssetStore> = Arc::new(
            LocalStorage::new(base_path.clone(), LOCAL_BASE_URL.to_string())
                .await
                .expect("Failed to create local storage"),
        );

        let service = AssetService::new(
            cdn.clone(),
            local.clone(),
            ServiceSettings {
                local_root: LOCAL_BASE_URL.to_string(),
                cdn_folder: "aula".to_string(),
                limits: UploadLimits::default(),
            },
        );

        Self {
            temp_dir,
            base_path,
            cdn,
            local,
            service,
        }
    }

    pub fn local_file(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}
