//! Asset service
//!
//! Entry points used by upload surfaces: upload, resolve and delete, plus the
//! `replace` workflow that swaps an entity's asset in a safe order:
//! upload new → persist new reference → delete old.

use std::future::Future;
use std::sync::Arc;

use aula_core::{
    AssetError, AssetFile, AssetPurpose, Config, ProviderId, StoredAsset, UploadLimits,
    UploadResult,
};
use aula_storage::{create_cdn_storage, create_local_storage, AssetStore};

use crate::deletion::DeletionCoordinator;
use crate::reporting::log_error;
use crate::resolver::ReferenceResolver;
use crate::router::StorageRouter;
use crate::validation::UploadValidator;

/// Settings the service needs beyond its two backends
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Public root URL of the local store
    pub local_root: String,
    /// Folder CDN uploads are placed under
    pub cdn_folder: String,
    pub limits: UploadLimits,
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            local_root: config.local.base_url.clone(),
            cdn_folder: config.cdn.folder.clone(),
            limits: config.limits.clone(),
        }
    }
}

/// Outcome of a successful [`AssetService::replace`]
#[derive(Debug)]
pub struct ReplaceOutcome {
    /// The new asset, already persisted by the caller
    pub result: UploadResult,
    /// Failure removing the previous asset. The entity already points at the
    /// new asset, so this only leaves an orphan behind.
    pub cleanup_error: Option<AssetError>,
}

/// Failure of [`AssetService::replace`]. In both cases the previous asset is untouched.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Failed to persist new asset reference: {0}")]
    Persist(#[source] E),
}

pub struct AssetService {
    validator: UploadValidator,
    router: StorageRouter,
    coordinator: DeletionCoordinator,
}

impl AssetService {
    pub fn new(
        cdn: Arc<dyn AssetStore>,
        local: Arc<dyn AssetStore>,
        settings: ServiceSettings,
    ) -> Self {
        let resolver = ReferenceResolver::new(settings.local_root);
        Self {
            validator: UploadValidator::new(settings.limits),
            router: StorageRouter::new(
                cdn.clone(),
                local.clone(),
                resolver.clone(),
                settings.cdn_folder,
            ),
            coordinator: DeletionCoordinator::new(cdn, local, resolver),
        }
    }

    /// Build the service and both backends from configuration
    pub async fn from_config(config: &Config) -> Result<Self, AssetError> {
        config
            .validate()
            .map_err(|e| AssetError::Config(e.to_string()))?;

        let cdn = create_cdn_storage(config).map_err(|e| AssetError::Config(e.to_string()))?;
        let local = create_local_storage(config)
            .await
            .map_err(|e| AssetError::Config(e.to_string()))?;

        tracing::info!(
            environment = %config.environment,
            cdn_folder = %config.cdn.folder,
            local_root = %config.local.base_url,
            "Asset service initialized"
        );

        Ok(Self::new(cdn, local, ServiceSettings::from_config(config)))
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        self.router.resolver()
    }

    /// Validate and store an uploaded file for `purpose`
    pub async fn upload(
        &self,
        file: AssetFile,
        purpose: AssetPurpose,
    ) -> Result<UploadResult, AssetError> {
        let category = self.validator.validate(&file, purpose).map_err(|e| {
            let err = AssetError::from(e);
            log_error(&err, &file.filename);
            err
        })?;
        self.router.store(&file, category, purpose).await
    }

    /// Displayable URL for a persisted reference, `None` when there is nothing to show
    pub fn resolve(&self, reference: Option<&str>, purpose: AssetPurpose) -> Option<String> {
        self.router.resolver().resolve(reference, purpose)
    }

    /// Delete the asset behind a persisted reference.
    ///
    /// Pass the owning entity's `purpose` when known: a bare filename is then
    /// looked up in that folder only.
    pub async fn delete(
        &self,
        reference: Option<&str>,
        known_provider: Option<ProviderId>,
        purpose: Option<AssetPurpose>,
    ) -> Result<(), AssetError> {
        self.coordinator
            .delete(reference, known_provider, purpose)
            .await
    }

    pub async fn delete_stored(&self, asset: &StoredAsset) -> Result<(), AssetError> {
        self.coordinator.delete_stored(asset).await
    }

    /// Replace an entity's asset.
    ///
    /// Uploads `file`, hands the result to `persist` and only then deletes the
    /// previous reference. When `persist` fails the new upload is removed
    /// again on a best-effort basis and the previous asset stays in place.
    pub async fn replace<F, Fut, E>(
        &self,
        file: AssetFile,
        purpose: AssetPurpose,
        previous: Option<&str>,
        previous_provider: Option<ProviderId>,
        persist: F,
    ) -> Result<ReplaceOutcome, ReplaceError<E>>
    where
        F: FnOnce(UploadResult) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: std::error::Error + 'static,
    {
        let result = self.upload(file, purpose).await?;

        if let Err(e) = persist(result.clone()).await {
            tracing::warn!(
                error = %e,
                provider = %result.provider,
                reference = %result.reference,
                "Failed to persist new asset reference, removing uploaded asset"
            );
            let rollback = self
                .delete(
                    Some(result.reference.as_str()),
                    Some(result.provider),
                    Some(purpose),
                )
                .await;
            if let Err(cleanup) = rollback {
                tracing::warn!(
                    error = %cleanup,
                    reference = %result.reference,
                    "Failed to remove orphaned upload"
                );
            }
            return Err(ReplaceError::Persist(e));
        }

        let cleanup_error = match self
            .delete(previous, previous_provider, Some(purpose))
            .await
        {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = ?e.provider(),
                    previous = ?previous,
                    "Failed to delete previous asset"
                );
                Some(e)
            }
        };

        Ok(ReplaceOutcome {
            result,
            cleanup_error,
        })
    }
}
