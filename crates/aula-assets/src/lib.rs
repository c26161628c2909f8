//! Aula Assets Library
//!
//! Hybrid asset storage for the school intranet. Uploads are classified by
//! MIME type and routed to the CDN object store (images) or the local file
//! store (documents, videos). Persisted references of every historical shape
//! resolve back to a displayable URL, and deletions are dispatched to the
//! backend that owns the reference.
//!
//! [`AssetService`] wires the pieces together:
//!
//! - [`classifier`]: MIME type → [`AssetCategory`](aula_core::AssetCategory)
//! - [`validation`]: per-purpose checks ahead of routing
//! - [`router`]: backend selection and upload
//! - [`resolver`]: stored reference → URL
//! - [`deletion`]: stored reference → owning backend → delete

pub mod classifier;
pub mod deletion;
pub mod reporting;
pub mod resolver;
pub mod router;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use classifier::{classify, mime_essence, DOCUMENT_CONTENT_TYPES};
pub use deletion::DeletionCoordinator;
pub use reporting::log_error;
pub use resolver::ReferenceResolver;
pub use router::{generate_filename, StorageRouter};
pub use service::{AssetService, ReplaceError, ReplaceOutcome, ServiceSettings};
pub use validation::UploadValidator;
