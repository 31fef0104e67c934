//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The pipeline only ever moves whole files between the object store and local
/// disk, so the trait is expressed in terms of local paths rather than buffers.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch `storage_key` into a newly created file at `destination`.
    ///
    /// Returns the number of bytes written. The file is flushed and closed when this
    /// returns. A missing object yields `StorageError::NotFound`.
    async fn download_to_file(&self, storage_key: &str, destination: &Path) -> StorageResult<u64>;

    /// Store the file at `source` under `storage_key` with the given content type.
    ///
    /// Returns the public URL of the stored object.
    async fn upload_file(
        &self,
        source: &Path,
        storage_key: &str,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Delete the object stored under `storage_key`.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
