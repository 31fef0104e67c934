use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// S3-compatible storage implementation (AWS S3, Cloudflare R2, MinIO)
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    endpoint_url: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `endpoint_url` - Endpoint of the S3-compatible provider
    ///   (e.g., "https://<account>.r2.cloudflarestorage.com", "http://localhost:9000")
    /// * `bucket` - Bucket name
    /// * `region` - Region identifier ("auto" for R2)
    /// * `access_key_id` / `secret_access_key` - Static credentials
    pub fn new(
        endpoint_url: String,
        bucket: String,
        region: String,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> StorageResult<Self> {
        let allow_http = endpoint_url.starts_with("http://");
        let store = AmazonS3Builder::new()
            .with_endpoint(endpoint_url.clone())
            .with_allow_http(allow_http)
            .with_virtual_hosted_style_request(false)
            .with_region(region)
            .with_bucket_name(bucket.clone())
            .with_access_key_id(access_key_id)
            .with_secret_access_key(secret_access_key)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        tracing::info!(bucket = %bucket, endpoint = %endpoint_url, "S3 storage initialized");

        Ok(S3Storage {
            store,
            bucket,
            endpoint_url,
        })
    }

    /// Path-style public URL: {endpoint}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

/// Object keys go to the store as given; only the empty key is refused.
fn object_path(storage_key: &str) -> StorageResult<ObjectPath> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    Ok(ObjectPath::from(storage_key))
}

#[async_trait]
impl Storage for S3Storage {
    async fn download_to_file(&self, storage_key: &str, destination: &Path) -> StorageResult<u64> {
        let location = object_path(storage_key)?;
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let mut file = tokio::fs::File::create(destination).await.map_err(|e| {
            StorageError::DownloadFailed(format!(
                "Failed to create file {}: {}",
                destination.display(),
                e
            ))
        })?;

        let mut stream = result.into_stream();
        let mut size = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk: Bytes = chunk.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 stream download error"
                );
                StorageError::DownloadFailed(e.to_string())
            })?;
            file.write_all(&chunk).await.map_err(|e| {
                StorageError::DownloadFailed(format!(
                    "Failed to write file {}: {}",
                    destination.display(),
                    e
                ))
            })?;
            size += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            path = %destination.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(size)
    }

    async fn upload_file(
        &self,
        source: &Path,
        storage_key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        let location = object_path(storage_key)?;
        let start = std::time::Instant::now();

        // Artifacts are read whole and sent in a single put.
        let data = tokio::fs::read(source).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to open file {} for upload: {}",
                source.display(),
                e
            ))
        })?;
        let size = data.len() as u64;

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.generate_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            url = %url,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let location = object_path(storage_key)?;
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(endpoint: &str) -> S3Storage {
        S3Storage::new(
            endpoint.to_string(),
            "videos".to_string(),
            "auto".to_string(),
            "key-id",
            "secret",
        )
        .expect("builder accepts static credentials")
    }

    #[test]
    fn test_generate_url_is_path_style() {
        let s3 = storage("https://account.r2.cloudflarestorage.com/");
        assert_eq!(
            s3.generate_url("clip_1.webm"),
            "https://account.r2.cloudflarestorage.com/videos/clip_1.webm"
        );
    }

    #[test]
    fn test_backend_type() {
        assert_eq!(storage("http://localhost:9000").backend_type(), StorageBackend::S3);
    }

    #[test]
    fn test_object_path_keeps_key() {
        for key in ["final..v2.mp4", "a..b.mp4", "clip_1.webm"] {
            assert_eq!(object_path(key).unwrap().to_string(), key);
        }
    }

    #[tokio::test]
    async fn test_rejects_empty_key_before_network() {
        let s3 = storage("http://localhost:9000");
        let err = s3.delete("").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
