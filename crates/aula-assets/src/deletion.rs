//! Deletion coordinator: maps a stored reference to its owning backend.

use std::sync::Arc;
use std::time::Instant;

use aula_core::urls::is_absolute_url;
use aula_core::{is_sentinel, AssetError, AssetPurpose, ProviderId, StoredAsset};
use aula_storage::AssetStore;

use crate::reporting::log_error;
use crate::resolver::ReferenceResolver;

pub struct DeletionCoordinator {
    cdn: Arc<dyn AssetStore>,
    local: Arc<dyn AssetStore>,
    resolver: ReferenceResolver,
}

impl DeletionCoordinator {
    pub fn new(
        cdn: Arc<dyn AssetStore>,
        local: Arc<dyn AssetStore>,
        resolver: ReferenceResolver,
    ) -> Self {
        Self {
            cdn,
            local,
            resolver,
        }
    }

    /// Delete the asset behind `reference`.
    ///
    /// Empty references and placeholder sentinels are no-ops. Without a
    /// `known_provider` the owner is inferred: absolute URLs under the CDN
    /// public base belong to the CDN, everything else to the local store.
    /// `purpose` places a bare filename in its folder, the way the resolver
    /// does. Missing objects are not errors.
    pub async fn delete(
        &self,
        reference: Option<&str>,
        known_provider: Option<ProviderId>,
        purpose: Option<AssetPurpose>,
    ) -> Result<(), AssetError> {
        let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
            tracing::debug!("No asset reference, nothing to delete");
            return Ok(());
        };

        if is_sentinel(reference) {
            tracing::debug!(reference = %reference, "Skipping placeholder asset");
            return Ok(());
        }

        let provider = known_provider.unwrap_or_else(|| self.infer_provider(reference));
        match provider {
            ProviderId::Cdn => self.delete_from_cdn(reference).await,
            ProviderId::LocalStore => self.delete_from_local(reference, purpose).await,
        }
    }

    /// Delete a record that carries its provider
    pub async fn delete_stored(&self, asset: &StoredAsset) -> Result<(), AssetError> {
        self.delete(Some(asset.reference.as_str()), Some(asset.provider), None)
            .await
    }

    /// Provider owning a reference persisted without one
    pub fn infer_provider(&self, reference: &str) -> ProviderId {
        if is_absolute_url(reference) && self.cdn.object_key(reference).is_some() {
            ProviderId::Cdn
        } else {
            ProviderId::LocalStore
        }
    }

    async fn delete_from_cdn(&self, reference: &str) -> Result<(), AssetError> {
        let Some(key) = self.cdn.object_key(reference) else {
            tracing::warn!(
                reference = %reference,
                "Reference is not served by the CDN, skipping delete"
            );
            return Ok(());
        };

        self.delete_key(&self.cdn, &key).await
    }

    async fn delete_from_local(
        &self,
        reference: &str,
        purpose: Option<AssetPurpose>,
    ) -> Result<(), AssetError> {
        if is_absolute_url(reference) {
            let Some(key) = self.local.object_key(reference) else {
                tracing::warn!(
                    reference = %reference,
                    "Reference is not served by the local store, skipping delete"
                );
                return Ok(());
            };
            return self.delete_key(&self.local, &key).await;
        }

        // Folder-qualified and root-prefixed paths resolve the same way for
        // every purpose.
        let reference_path = reference.trim_start_matches('/');
        if reference_path.contains('/') {
            let key = self
                .resolver
                .resolve(Some(reference), AssetPurpose::General)
                .and_then(|url| self.local.object_key(&url));
            let Some(key) = key else {
                tracing::warn!(reference = %reference, "Malformed asset reference, skipping delete");
                return Ok(());
            };
            return self.delete_key(&self.local, &key).await;
        }

        let Some(filename) = self.local.object_key(reference_path) else {
            tracing::warn!(reference = %reference, "Malformed asset reference, skipping delete");
            return Ok(());
        };

        let key = match purpose {
            Some(purpose) => format!("{}/{}", purpose.folder(), filename),
            None => match self.locate_bare_filename(&filename).await? {
                Some(key) => key,
                None => return Ok(()),
            },
        };
        self.delete_key(&self.local, &key).await
    }

    /// Key of a bare filename stored without its purpose.
    ///
    /// The single purpose folder holding it, else the store root. When several
    /// folders hold the same name the owner is unknown and nothing is deleted.
    async fn locate_bare_filename(&self, filename: &str) -> Result<Option<String>, AssetError> {
        let mut found = Vec::new();
        for purpose in AssetPurpose::ALL {
            let key = format!("{}/{}", purpose.folder(), filename);
            let exists = self.local.exists(&key).await.map_err(|e| {
                let err = AssetError::DeleteFailed {
                    provider: ProviderId::LocalStore,
                    cause: e.to_string(),
                };
                log_error(&err, &key);
                err
            })?;
            if exists {
                found.push(key);
            }
        }

        match found.len() {
            0 => {
                tracing::debug!(filename = %filename, "Asset not found in any purpose folder, using store root");
                Ok(Some(filename.to_string()))
            }
            1 => Ok(found.pop()),
            _ => {
                tracing::warn!(
                    filename = %filename,
                    candidates = ?found,
                    "Bare filename exists in several purpose folders, skipping delete"
                );
                Ok(None)
            }
        }
    }

    async fn delete_key(&self, store: &Arc<dyn AssetStore>, key: &str) -> Result<(), AssetError> {
        let provider = store.provider();
        let start = Instant::now();

        store.delete(key).await.map_err(|e| {
            let err = AssetError::DeleteFailed {
                provider,
                cause: e.to_string(),
            };
            log_error(&err, key);
            err
        })?;

        tracing::info!(
            provider = %provider,
            key = %key,
            duration_ms = start.elapsed().as_millis() as u64,
            "Asset deleted"
        );
        Ok(())
    }
}
