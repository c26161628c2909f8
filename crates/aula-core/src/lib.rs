//! Aula Core Library
//!
//! Domain models, folder conventions, error types and configuration shared by
//! the storage backends and the asset router.

pub mod config;
pub mod conventions;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod urls;

// Re-export commonly used types
pub use config::{CdnConfig, Config, LocalStoreConfig, UploadLimits};
pub use conventions::{
    is_sentinel, AssetPurpose, PurposeConvention, CONVENTION_VERSION, SENTINEL_FILENAMES,
};
pub use error::{AssetError, ErrorMetadata, LogLevel, ValidationError};
pub use models::{AssetCategory, AssetFile, StoredAsset, UploadResult};
pub use storage_types::ProviderId;
