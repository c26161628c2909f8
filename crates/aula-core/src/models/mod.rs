//! Data models shared by the storage backends and the asset router.

mod asset;
mod storage;

pub use asset::*;
pub use storage::*;
