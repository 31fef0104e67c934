use async_trait::async_trait;
use std::path::Path;
use vidopt_storage::{LocalStorage, Storage, StorageBackend, StorageError, StorageResult};

/// Local storage whose delete fails for one key.
pub struct FailingDeletes {
    inner: LocalStorage,
    fail_key: &'static str,
}

impl FailingDeletes {
    pub fn new(inner: LocalStorage, fail_key: &'static str) -> Self {
        Self { inner, fail_key }
    }
}

#[async_trait]
impl Storage for FailingDeletes {
    async fn download_to_file(&self, storage_key: &str, destination: &Path) -> StorageResult<u64> {
        self.inner.download_to_file(storage_key, destination).await
    }

    async fn upload_file(
        &self,
        source: &Path,
        storage_key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        self.inner.upload_file(source, storage_key, content_type).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        if storage_key == self.fail_key {
            return Err(StorageError::DeleteFailed("access denied".to_string()));
        }
        self.inner.delete(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
