//! Storage records: what an upload produced and what owning entities persist.

use serde::{Deserialize, Serialize};

use crate::storage_types::ProviderId;

/// Asset reference as persisted on an owning entity (a user's photo, a
/// college's logo, ...). Carrying the provider means deletion never has to
/// guess which backend owns the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub provider: ProviderId,
    pub reference: String,
}

impl StoredAsset {
    pub fn new(provider: ProviderId, reference: impl Into<String>) -> Self {
        Self {
            provider,
            reference: reference.into(),
        }
    }
}

/// Normalized outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub provider: ProviderId,
    /// Value to persist on the owning entity
    pub reference: String,
    /// Render-ready URL
    pub url: String,
    pub size: u64,
    pub mime_type: String,
    /// CDN object identifier; absent for local uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl UploadResult {
    pub fn stored_asset(&self) -> StoredAsset {
        StoredAsset::new(self.provider, self.reference.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_result_uses_camel_case() {
        let result = UploadResult {
            provider: ProviderId::LocalStore,
            reference: "a.pdf".to_string(),
            url: "http://localhost:3000/uploads/documents/a.pdf".to_string(),
            size: 10,
            mime_type: "application/pdf".to_string(),
            public_id: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["mimeType"], "application/pdf");
        assert_eq!(json["provider"], "local");
        assert!(json.get("publicId").is_none());

        assert_eq!(
            result.stored_asset(),
            StoredAsset::new(ProviderId::LocalStore, "a.pdf")
        );
    }
}
