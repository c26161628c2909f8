use crate::keys::{generate_storage_key, key_from_reference, validate_key};
use crate::traits::{AssetStore, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use aula_core::ProviderId;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ClientOptions, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::sync::Arc;
use std::time::Duration;

/// CDN-backed object store
///
/// Objects live in an S3-compatible bucket and are served from a public CDN
/// base URL. Every upload returns the absolute CDN URL of the object.
#[derive(Clone)]
pub struct CdnStorage {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl CdnStorage {
    /// Create a new CdnStorage over an S3 bucket
    ///
    /// # Arguments
    /// * `bucket` - Bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_url` - CDN base URL objects are served from; defaults to the
    ///   bucket's own public URL
    /// * `timeout` - Request timeout for every call to the bucket
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_url: Option<String>,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone())
            .with_client_options(ClientOptions::new().with_timeout(timeout));

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let public_base_url = match public_url {
            Some(url) => url,
            // Path-style for S3-compatible providers: {endpoint}/{bucket}
            None => match endpoint_url {
                Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
                None => format!("https://{}.s3.{}.amazonaws.com", bucket, region),
            },
        };

        Ok(Self::with_store(Arc::new(store), public_base_url))
    }

    /// Wrap an already-built object store served from `public_base_url`
    pub fn with_store(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        CdnStorage {
            store,
            public_base_url,
        }
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

#[async_trait]
impl AssetStore for CdnStorage {
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject> {
        let key = generate_storage_key(folder, filename);
        validate_key(&key)?;

        let size = data.len() as u64;
        let location = Path::from(key.clone());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "CDN upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.public_url(&key);

        tracing::info!(
            key = %key,
            url = %url,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "CDN upload successful"
        );

        Ok(StoredObject { key, url })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;

        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "CDN delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "CDN delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;

        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn object_key(&self, reference: &str) -> Option<String> {
        key_from_reference(&self.public_base_url, reference)
    }

    fn provider(&self) -> ProviderId {
        ProviderId::Cdn
    }
}
