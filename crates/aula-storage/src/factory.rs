use crate::{AssetStore, CdnStorage, LocalStorage, StorageError, StorageResult};
use aula_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Create the CDN object store from configuration
pub fn create_cdn_storage(config: &Config) -> StorageResult<Arc<dyn AssetStore>> {
    let cdn = &config.cdn;

    let bucket = cdn
        .bucket
        .clone()
        .ok_or_else(|| StorageError::ConfigError("AULA_CDN_BUCKET not configured".to_string()))?;
    let region = cdn.region.clone().ok_or_else(|| {
        StorageError::ConfigError("AULA_CDN_REGION or AWS_REGION not configured".to_string())
    })?;

    let storage = CdnStorage::new(
        bucket,
        region,
        cdn.endpoint.clone(),
        cdn.public_url.clone(),
        Duration::from_secs(cdn.timeout_secs),
    )?;

    tracing::debug!(
        public_base_url = %storage.public_base_url(),
        "CDN storage configured"
    );

    Ok(Arc::new(storage))
}

/// Create the application-local file store from configuration
pub async fn create_local_storage(config: &Config) -> StorageResult<Arc<dyn AssetStore>> {
    let storage = LocalStorage::new(&config.local.path, config.local.base_url.clone()).await?;

    tracing::debug!(
        path = %config.local.path,
        base_url = %storage.base_url(),
        "Local storage configured"
    );

    Ok(Arc::new(storage))
}
