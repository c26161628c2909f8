//! Storage router: decides which backend receives an upload.
//!
//! Images go to the CDN object store, every other accepted category goes to
//! the local file store under the purpose's folder.

use std::sync::Arc;
use std::time::Instant;

use aula_core::{AssetCategory, AssetError, AssetFile, AssetPurpose, ProviderId, UploadResult};
use aula_storage::AssetStore;
use uuid::Uuid;

use crate::classifier::{classify, mime_essence};
use crate::reporting::log_error;
use crate::resolver::ReferenceResolver;

pub struct StorageRouter {
    cdn: Arc<dyn AssetStore>,
    local: Arc<dyn AssetStore>,
    resolver: ReferenceResolver,
    /// Folder all CDN uploads are placed under
    cdn_folder: String,
}

impl StorageRouter {
    pub fn new(
        cdn: Arc<dyn AssetStore>,
        local: Arc<dyn AssetStore>,
        resolver: ReferenceResolver,
        cdn_folder: impl Into<String>,
    ) -> Self {
        Self {
            cdn,
            local,
            resolver,
            cdn_folder: cdn_folder.into(),
        }
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    /// Provider a supported category is dispatched to
    pub fn provider_for(category: AssetCategory) -> ProviderId {
        match category {
            AssetCategory::Image => ProviderId::Cdn,
            _ => ProviderId::LocalStore,
        }
    }

    /// Store `file` for `purpose`.
    ///
    /// `declared` is the category the caller classified the file as. The
    /// file's own content type is classified again and wins when the two
    /// disagree; if either is unsupported no backend is contacted.
    pub async fn store(
        &self,
        file: &AssetFile,
        declared: AssetCategory,
        purpose: AssetPurpose,
    ) -> Result<UploadResult, AssetError> {
        let category = classify(&file.content_type);
        if !declared.is_supported() || !category.is_supported() {
            tracing::debug!(
                content_type = %file.content_type,
                declared = %declared,
                classified = %category,
                purpose = %purpose,
                "Rejecting unsupported asset"
            );
            return Err(AssetError::Unsupported {
                content_type: file.content_type.clone(),
                purpose,
            });
        }

        if declared != category {
            tracing::warn!(
                content_type = %file.content_type,
                declared = %declared,
                classified = %category,
                "Declared category differs from content type, routing by content type"
            );
        }

        let provider = Self::provider_for(category);
        let (store, folder) = match provider {
            ProviderId::Cdn => (&self.cdn, self.cdn_folder.as_str()),
            ProviderId::LocalStore => (&self.local, purpose.folder()),
        };

        let filename = generate_filename(file);
        let size_bytes = file.size();
        let start = Instant::now();

        let stored = store
            .upload(folder, &filename, &file.content_type, file.data.clone())
            .await
            .map_err(|e| {
                let err = AssetError::UploadFailed {
                    provider,
                    cause: e.to_string(),
                };
                log_error(&err, &filename);
                err
            })?;

        tracing::info!(
            provider = %provider,
            key = %stored.key,
            purpose = %purpose,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_millis() as u64,
            "Asset uploaded"
        );

        let result = match provider {
            ProviderId::Cdn => UploadResult {
                provider,
                reference: stored.url.clone(),
                url: stored.url,
                size: size_bytes as u64,
                mime_type: file.content_type.clone(),
                public_id: Some(stored.key),
            },
            ProviderId::LocalStore => {
                let reference = if purpose.convention().qualified_reference {
                    stored.key.clone()
                } else {
                    filename
                };
                let url = self
                    .resolver
                    .resolve(Some(reference.as_str()), purpose)
                    .unwrap_or(stored.url);

                UploadResult {
                    provider,
                    reference,
                    url,
                    size: size_bytes as u64,
                    mime_type: file.content_type.clone(),
                    public_id: None,
                }
            }
        };

        Ok(result)
    }
}

/// Generated object name: `{uuid}.{extension}`.
///
/// The extension comes from the original filename, or from the content type
/// when the filename has none.
pub fn generate_filename(file: &AssetFile) -> String {
    let extension = file
        .extension()
        .or_else(|| extension_for_content_type(&file.content_type))
        .unwrap_or_else(|| "bin".to_string());

    format!("{}.{}", Uuid::new_v4(), extension)
}

fn extension_for_content_type(content_type: &str) -> Option<String> {
    let essence = mime_essence(content_type);
    let preferred = match essence.as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        "text/csv" => "csv",
        _ => {
            return mime_guess::get_mime_extensions_str(&essence)
                .and_then(|extensions| extensions.first())
                .map(|extension| extension.to_string());
        }
    };
    Some(preferred.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_storage::test_helpers::MockStorage;

    struct Fixture {
        cdn: MockStorage,
        local: MockStorage,
        router: StorageRouter,
    }

    fn fixture() -> Fixture {
        let cdn = MockStorage::cdn();
        let local = MockStorage::local();
        let router = StorageRouter::new(
            Arc::new(cdn.clone()),
            Arc::new(local.clone()),
            ReferenceResolver::new("http://localhost:3000/uploads"),
            "aula",
        );
        Fixture { cdn, local, router }
    }

    fn file(name: &str, content_type: &str) -> AssetFile {
        AssetFile::new(name, content_type, vec![1u8; 64])
    }

    #[tokio::test]
    async fn images_go_to_cdn() {
        let f = fixture();
        let result = f
            .router
            .store(&file("foto.jpg", "image/jpeg"), AssetCategory::Image, AssetPurpose::Profile)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderId::Cdn);
        assert!(result.url.starts_with("https://cdn.example.edu/aula/"));
        assert!(result.url.ends_with(".jpg"));
        assert_eq!(result.reference, result.url);
        let key = result.public_id.as_deref().unwrap();
        assert!(key.starts_with("aula/"));
        assert!(f.cdn.has_file(key));
        assert_eq!(f.local.call_count(), 0);
        assert_eq!(result.size, 64);
        assert_eq!(result.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn documents_go_to_local_store() {
        let f = fixture();
        let result = f
            .router
            .store(
                &file("acta.pdf", "application/pdf"),
                AssetCategory::Document,
                AssetPurpose::Documents,
            )
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderId::LocalStore);
        assert!(!result.reference.contains('/'));
        assert!(result.reference.ends_with(".pdf"));
        assert_eq!(
            result.url,
            format!("http://localhost:3000/uploads/documents/{}", result.reference)
        );
        assert_eq!(result.public_id, None);
        assert!(f.local.has_file(&format!("documents/{}", result.reference)));
        assert_eq!(f.cdn.call_count(), 0);
    }

    #[tokio::test]
    async fn qualified_purposes_store_folder_in_reference() {
        let f = fixture();
        let result = f
            .router
            .store(
                &file("escudo.pdf", "application/pdf"),
                AssetCategory::Document,
                AssetPurpose::Logos,
            )
            .await
            .unwrap();
        assert!(result.reference.starts_with("logos/"));
        assert_eq!(
            result.url,
            format!("http://localhost:3000/uploads/{}", result.reference)
        );
        assert!(f.local.has_file(&result.reference));
    }

    #[tokio::test]
    async fn videos_go_to_local_store() {
        let f = fixture();
        let result = f
            .router
            .store(&file("clase.mp4", "video/mp4"), AssetCategory::Video, AssetPurpose::General)
            .await
            .unwrap();
        assert_eq!(result.provider, ProviderId::LocalStore);
        assert!(result.url.contains("/general/"));
    }

    #[tokio::test]
    async fn unsupported_performs_no_backend_call() {
        let f = fixture();
        let err = f
            .router
            .store(
                &file("setup.exe", "application/x-msdownload"),
                AssetCategory::Unsupported,
                AssetPurpose::General,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AssetError::Unsupported { .. }));
        assert_eq!(f.cdn.call_count(), 0);
        assert_eq!(f.local.call_count(), 0);
    }

    #[tokio::test]
    async fn declared_supported_but_content_unsupported_is_rejected() {
        let f = fixture();
        let err = f
            .router
            .store(
                &file("setup.exe", "application/x-msdownload"),
                AssetCategory::Image,
                AssetPurpose::Profile,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Unsupported { .. }));
        assert_eq!(f.cdn.call_count() + f.local.call_count(), 0);
    }

    #[tokio::test]
    async fn routes_by_content_type_when_declaration_disagrees() {
        let f = fixture();
        let result = f
            .router
            .store(&file("foto.png", "image/png"), AssetCategory::Document, AssetPurpose::General)
            .await
            .unwrap();
        assert_eq!(result.provider, ProviderId::Cdn);
    }

    #[tokio::test]
    async fn backend_failure_is_upload_failed() {
        let f = fixture();
        f.cdn.fail_uploads(true);
        let err = f
            .router
            .store(&file("foto.png", "image/png"), AssetCategory::Image, AssetPurpose::Avatars)
            .await
            .unwrap_err();

        match err {
            AssetError::UploadFailed { provider, cause } => {
                assert_eq!(provider, ProviderId::Cdn);
                assert!(cause.contains("mock upload failure"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // No retry
        assert_eq!(f.cdn.call_count(), 1);
    }

    #[test]
    fn generated_filename_keeps_extension() {
        let name = generate_filename(&file("Foto Perfil.PNG", "image/png"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 36 + 4);
        assert!(Uuid::parse_str(&name[..36]).is_ok());
    }

    #[test]
    fn generated_filename_falls_back_to_content_type() {
        assert!(generate_filename(&file("blob", "image/jpeg")).ends_with(".jpg"));
        assert!(generate_filename(&file("blob", "application/pdf")).ends_with(".pdf"));
        assert!(generate_filename(&file("blob", "application/x-unknown-thing")).ends_with(".bin"));
    }

    #[test]
    fn generated_filenames_are_unique() {
        let f = file("foto.png", "image/png");
        assert_ne!(generate_filename(&f), generate_filename(&f));
    }
}
