//! Metadata probe: file size, video dimensions via ffprobe, image dimensions from
//! the encoded header.

use crate::command::{ToolError, ToolRunner};
use crate::encoding::probe_dimensions_args;
use image::ImageReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe tool failed: {0}")]
    Tool(#[from] ToolError),

    #[error("unexpected dimensions format: {0:?}")]
    Format(String),

    #[error("failed to read image header: {0}")]
    Image(String),
}

/// Parse ffprobe's `WxH` output.
pub fn parse_dimensions(output: &str) -> Result<(u32, u32), ProbeError> {
    let trimmed = output.trim();
    let parts: Vec<&str> = trimmed.split('x').collect();
    if parts.len() != 2 {
        return Err(ProbeError::Format(trimmed.to_string()));
    }
    let width = parts[0]
        .parse::<u32>()
        .map_err(|_| ProbeError::Format(trimmed.to_string()))?;
    let height = parts[1]
        .parse::<u32>()
        .map_err(|_| ProbeError::Format(trimmed.to_string()))?;
    Ok((width, height))
}

/// Read-only inspection of local artifacts.
#[derive(Clone)]
pub struct MetadataProbe {
    ffprobe_path: String,
    runner: Arc<dyn ToolRunner>,
}

impl MetadataProbe {
    pub fn new(ffprobe_path: impl Into<String>, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            runner,
        }
    }

    pub async fn file_size(&self, path: &Path) -> std::io::Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    /// Width and height of the first video stream.
    pub async fn video_dimensions(&self, path: &Path) -> Result<(u32, u32), ProbeError> {
        let output = self
            .runner
            .run(&self.ffprobe_path, &probe_dimensions_args(path))
            .await?;
        parse_dimensions(&output.stdout)
    }

    /// Width and height from the image header, without decoding pixels.
    pub async fn image_dimensions(&self, path: &Path) -> Result<(u32, u32), ProbeError> {
        let path: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            ImageReader::open(&path)
                .map_err(|e| ProbeError::Image(e.to_string()))?
                .with_guessed_format()
                .map_err(|e| ProbeError::Image(e.to_string()))?
                .into_dimensions()
                .map_err(|e| ProbeError::Image(e.to_string()))
        })
        .await
        .map_err(|e| ProbeError::Image(format!("probe task failed: {}", e)))?
    }
}
