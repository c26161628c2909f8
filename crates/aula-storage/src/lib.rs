//! Aula Storage Library
//!
//! Storage backends for the asset router: a CDN-backed object store for
//! images and an application-local file store for everything else. Both
//! implement the [`AssetStore`] trait.
//!
//! # Storage key format
//!
//! Keys are `{folder}/{filename}`. Keys must not contain `..`, empty segments
//! or a leading `/`. Key handling is centralized in the `keys` module so both
//! backends stay consistent.

pub mod cdn;
pub mod factory;
pub(crate) mod keys;
pub mod local;
pub mod traits;

// Test helpers (test builds and the `test-helpers` feature)
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use aula_core::ProviderId;
pub use cdn::CdnStorage;
pub use factory::{create_cdn_storage, create_local_storage};
pub use local::LocalStorage;
pub use traits::{AssetStore, StorageError, StorageResult, StoredObject};
