//! Transcoding pipeline orchestrator
//!
//! Two flows share one shape: download the source into a private run directory,
//! run ffmpeg, upload the artifacts, then describe them from the local copies.
//! Every local file is registered with a [`TempArtifacts`] guard the moment its path
//! is chosen, and the guard is dropped on every exit path, so nothing outlives a run.
//! Any fatal step aborts the rest of the run; dimension probing never does.

use crate::artifacts::{ArtifactKind, TempArtifacts};
use crate::command::{ToolError, ToolRunner};
use crate::encoding::{convert_args, thumbnail_args, transcode_args};
use crate::probe::MetadataProbe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use vidopt_core::{MediaDescriptor, PipelineRequest, PipelineResult, ProcessingConfig};
use vidopt_storage::{Storage, StorageError};

const THUMBNAIL_MIME_TYPE: &str = "image/png";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to prepare working directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("failed to download {key}: {source}")]
    Download {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("video optimization failed: {0}")]
    Transcode(#[source] ToolError),

    #[error("thumbnail generation failed: {0}")]
    Thumbnail(#[source] ToolError),

    #[error("thumbnail conversion failed: {0}")]
    ThumbnailConvert(#[source] ToolError),

    #[error("failed to upload {key}: {source}")]
    Upload {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Name of the step that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::InvalidArgument(_) => "validate",
            PipelineError::Workspace(_) => "workspace",
            PipelineError::Download { .. } => "download",
            PipelineError::Transcode(_) => "transcode",
            PipelineError::Thumbnail(_) => "thumbnail",
            PipelineError::ThumbnailConvert(_) => "thumbnail_convert",
            PipelineError::Upload { .. } => "upload",
            PipelineError::Stat { .. } => "stat",
        }
    }
}

/// Reduce a source key to its final path component.
///
/// `videos/2024/clip.mp4` becomes `clip.mp4`. Keys with no usable base name are
/// rejected.
pub fn sanitize_source_key(source_key: &str) -> Result<String, PipelineError> {
    let trimmed = source_key.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or_default();
    match base {
        "" => Err(PipelineError::InvalidArgument(
            "filename is required".to_string(),
        )),
        "." | ".." => Err(PipelineError::InvalidArgument(format!(
            "invalid filename: {}",
            source_key
        ))),
        _ => Ok(base.to_string()),
    }
}

/// File name without its final extension (`clip.tar.gz` -> `clip.tar`).
fn stem(base_name: &str) -> &str {
    match base_name.rfind('.') {
        Some(idx) => &base_name[..idx],
        None => base_name,
    }
}

/// Remote keys produced by one optimize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputKeys {
    pub optimized: String,
    pub thumbnail: String,
    pub converted_thumbnail: String,
}

impl OutputKeys {
    pub fn derive(base_name: &str, suffix: &str, format: &str) -> Self {
        let stem = stem(base_name);
        Self {
            optimized: format!("{}_{}.{}", stem, suffix, format),
            thumbnail: format!("{}_{}_thumbnail.png", stem, suffix),
            converted_thumbnail: format!("{}_{}_thumbnail_converted.png", stem, suffix),
        }
    }

    /// Key of the thumbnail-only flow. Not unique per call.
    pub fn thumbnail_only(base_name: &str) -> String {
        format!("{}_thumbnail.png", stem(base_name))
    }
}

/// Runs the optimize and thumbnail flows against the object store.
#[derive(Clone)]
pub struct TranscodePipeline {
    storage: Arc<dyn Storage>,
    runner: Arc<dyn ToolRunner>,
    probe: MetadataProbe,
    ffmpeg_path: String,
    work_dir: PathBuf,
}

impl TranscodePipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        runner: Arc<dyn ToolRunner>,
        config: &ProcessingConfig,
    ) -> Self {
        Self {
            probe: MetadataProbe::new(config.ffprobe_path.clone(), runner.clone()),
            storage,
            runner,
            ffmpeg_path: config.ffmpeg_path.clone(),
            work_dir: config.work_dir.clone(),
        }
    }

    /// Produce an optimized video and a converted thumbnail from `request.source_key`.
    #[tracing::instrument(skip(self, request), fields(source_key = %request.source_key))]
    pub async fn optimize(&self, request: &PipelineRequest) -> Result<PipelineResult, PipelineError> {
        let start = std::time::Instant::now();
        let base_name = sanitize_source_key(&request.source_key)?;
        let format = request.format();
        let suffix = Uuid::new_v4().to_string();
        let keys = OutputKeys::derive(&base_name, &suffix, format);

        let mut artifacts = self.start_run().await?;
        let input = self.download(&mut artifacts, &base_name).await?;

        let optimized = artifacts.register(ArtifactKind::Video, &keys.optimized, &keys.optimized);
        tracing::info!(key = %keys.optimized, resolution = ?request.resolution(), "Optimizing video");
        self.ffmpeg(transcode_args(&input, &optimized, request.resolution()))
            .await
            .map_err(PipelineError::Transcode)?;
        tracing::info!(key = %keys.optimized, "Video optimized");

        let thumbnail = artifacts.register(ArtifactKind::Thumbnail, &keys.thumbnail, &keys.thumbnail);
        tracing::info!(key = %keys.thumbnail, "Extracting thumbnail");
        self.ffmpeg(thumbnail_args(&input, &thumbnail))
            .await
            .map_err(PipelineError::Thumbnail)?;

        let converted = artifacts.register(
            ArtifactKind::ConvertedThumbnail,
            &keys.converted_thumbnail,
            &keys.converted_thumbnail,
        );
        tracing::info!(key = %keys.converted_thumbnail, "Converting thumbnail");
        self.ffmpeg(convert_args(&thumbnail, &converted))
            .await
            .map_err(PipelineError::ThumbnailConvert)?;
        tracing::info!(key = %keys.converted_thumbnail, "Thumbnail generated and converted");

        let video_mime = format!("video/{}", format);
        self.upload(&optimized, &keys.optimized, &video_mime).await?;
        self.upload(&converted, &keys.converted_thumbnail, THUMBNAIL_MIME_TYPE)
            .await?;

        let video = self
            .describe(&optimized, &keys.optimized, &video_mime, ArtifactKind::Video)
            .await?;
        let thumbnail = self
            .describe(
                &converted,
                &keys.converted_thumbnail,
                THUMBNAIL_MIME_TYPE,
                ArtifactKind::ConvertedThumbnail,
            )
            .await?;

        tracing::info!(
            video_key = %video.remote_key,
            thumbnail_key = %thumbnail.remote_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Optimize pipeline completed"
        );

        Ok(PipelineResult { video, thumbnail })
    }

    /// Produce only a thumbnail. Repeated calls for the same source overwrite it.
    #[tracing::instrument(skip(self))]
    pub async fn thumbnail(&self, source_key: &str) -> Result<MediaDescriptor, PipelineError> {
        let start = std::time::Instant::now();
        let base_name = sanitize_source_key(source_key)?;
        let key = OutputKeys::thumbnail_only(&base_name);

        let mut artifacts = self.start_run().await?;
        let input = self.download(&mut artifacts, &base_name).await?;

        let thumbnail = artifacts.register(ArtifactKind::Thumbnail, &key, &key);
        tracing::info!(key = %key, "Extracting thumbnail");
        self.ffmpeg(thumbnail_args(&input, &thumbnail))
            .await
            .map_err(PipelineError::Thumbnail)?;
        tracing::info!(key = %key, "Thumbnail generated");

        self.upload(&thumbnail, &key, THUMBNAIL_MIME_TYPE).await?;
        let descriptor = self
            .describe(&thumbnail, &key, THUMBNAIL_MIME_TYPE, ArtifactKind::Thumbnail)
            .await?;

        tracing::info!(
            thumbnail_key = %descriptor.remote_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Thumbnail pipeline completed"
        );

        Ok(descriptor)
    }

    async fn start_run(&self) -> Result<TempArtifacts, PipelineError> {
        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(PipelineError::Workspace)?;
        TempArtifacts::new_in(&self.work_dir).map_err(PipelineError::Workspace)
    }

    async fn download(
        &self,
        artifacts: &mut TempArtifacts,
        base_name: &str,
    ) -> Result<PathBuf, PipelineError> {
        let input = artifacts.register(ArtifactKind::Source, base_name, base_name);
        tracing::info!(key = %base_name, "Downloading source");
        let size = self
            .storage
            .download_to_file(base_name, &input)
            .await
            .map_err(|source| {
                tracing::error!(key = %base_name, error = %source, "Source download failed");
                PipelineError::Download {
                    key: base_name.to_string(),
                    source,
                }
            })?;
        tracing::info!(key = %base_name, size_bytes = size, "Source downloaded");
        Ok(input)
    }

    async fn ffmpeg(&self, args: Vec<String>) -> Result<(), ToolError> {
        self.runner
            .run(&self.ffmpeg_path, &args)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::error!(
                    command = %e.command(),
                    args = ?e.args(),
                    output = e.output().unwrap_or_default(),
                    error = %e,
                    "External tool failed"
                );
                e
            })
    }

    async fn upload(&self, path: &Path, key: &str, content_type: &str) -> Result<(), PipelineError> {
        tracing::info!(key = %key, content_type = %content_type, "Uploading artifact");
        let url = self
            .storage
            .upload_file(path, key, content_type)
            .await
            .map_err(|source| {
                tracing::error!(key = %key, error = %source, "Artifact upload failed");
                PipelineError::Upload {
                    key: key.to_string(),
                    source,
                }
            })?;
        tracing::info!(key = %key, url = %url, "Artifact uploaded");
        Ok(())
    }

    /// Size is required; dimensions fall back to 0x0.
    async fn describe(
        &self,
        path: &Path,
        key: &str,
        mime_type: &str,
        kind: ArtifactKind,
    ) -> Result<MediaDescriptor, PipelineError> {
        let filesize_bytes = self.probe.file_size(path).await.map_err(|source| {
            tracing::error!(path = %path.display(), error = %source, "Failed to get file info");
            PipelineError::Stat {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let dimensions = match kind {
            ArtifactKind::Video | ArtifactKind::Source => self.probe.video_dimensions(path).await,
            ArtifactKind::Thumbnail | ArtifactKind::ConvertedThumbnail => {
                self.probe.image_dimensions(path).await
            }
        };
        let (width, height) = dimensions.unwrap_or_else(|e| {
            tracing::warn!(key = %key, kind = ?kind, error = %e, "Failed to get dimensions");
            (0, 0)
        });

        Ok(MediaDescriptor {
            remote_key: key.to_string(),
            filesize_bytes,
            height,
            width,
            mime_type: mime_type.to_string(),
        })
    }
}
