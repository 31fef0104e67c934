//! Vidopt Storage Library
//!
//! Object store client used by the transcoding pipeline and the delete endpoint.
//! Objects are addressed by flat keys (the uploaded file name); the S3 backend talks
//! to any S3-compatible endpoint (R2, MinIO) and the local backend mirrors the same
//! key space under a directory for development and tests.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vidopt_core::StorageBackend;
