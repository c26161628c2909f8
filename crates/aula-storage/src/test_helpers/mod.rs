//! Test helpers for crates that build on the storage backends

mod mock_storage;

pub use mock_storage::MockStorage;
