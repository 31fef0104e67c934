use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
///
/// Mirrors the flat object key space under `base_path`. Used in development and tests.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/vidopt/objects")
    /// * `base_url` - Prefix for returned URLs (e.g., "http://localhost:9000/videos")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Root directory objects are stored under.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Keys must stay under `base_path`: no `..` component, no leading `/`, no backslash.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() {
            return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
        }
        if storage_key.starts_with('/')
            || storage_key.contains('\\')
            || storage_key.split('/').any(|part| part == "..")
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid characters: {}",
                storage_key
            )));
        }
        Ok(self.base_path.join(storage_key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn download_to_file(&self, storage_key: &str, destination: &Path) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let size = fs::copy(&path, destination).await.map_err(|e| {
            StorageError::DownloadFailed(format!(
                "Failed to copy {} to {}: {}",
                path.display(),
                destination.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(size)
    }

    async fn upload_file(
        &self,
        source: &Path,
        storage_key: &str,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let size = fs::copy(source, &path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                path.display(),
                e
            ))
        })?;

        let url = self.generate_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        // Deleting a missing object succeeds, as it does on S3.
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), key = %storage_key, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key = %storage_key, "Local storage delete of missing object");
                Ok(())
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn storage(dir: &TempDir) -> LocalStorage {
        LocalStorage::new(dir.path().join("objects"), "http://localhost:9000/videos".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        let source = dir.path().join("clip.webm");
        tokio::fs::write(&source, b"webm-bytes").await.unwrap();

        let url = storage
            .upload_file(&source, "clip_ab12.webm", "video/webm")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:9000/videos/clip_ab12.webm");

        let target = dir.path().join("copy.webm");
        let size = storage.download_to_file("clip_ab12.webm", &target).await.unwrap();
        assert_eq!(size, 10);
        assert_eq!(tokio::fs::read(&target).await.unwrap(), b"webm-bytes");
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        let err = storage
            .download_to_file("missing.mp4", &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        tokio::fs::write(storage.base_path().join("a.webm"), b"x")
            .await
            .unwrap();

        storage.delete("a.webm").await.unwrap();
        storage.delete("a.webm").await.unwrap();
        assert!(!storage.base_path().join("a.webm").exists());
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        for key in ["", "../escape", "/etc/passwd", "a/../../b", "..", "a\\b"] {
            let err = storage.delete(key).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "{}", key);
        }
    }

    #[tokio::test]
    async fn test_dots_inside_a_name_are_allowed() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        tokio::fs::write(storage.base_path().join("final..v2.mp4"), b"v2")
            .await
            .unwrap();

        let target = dir.path().join("out.mp4");
        let size = storage.download_to_file("final..v2.mp4", &target).await.unwrap();
        assert_eq!(size, 2);
        storage.delete("final..v2.mp4").await.unwrap();
    }
}
