//! Scoped ownership of the temporary files created by one pipeline run.
//!
//! Each run gets a private working directory. Files are registered before the step
//! that writes them starts, so a half-written output is removed too. Dropping
//! [`TempArtifacts`] deletes every registered file and then the directory, on every
//! exit path including cancellation.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Source,
    Video,
    Thumbnail,
    ConvertedThumbnail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempArtifact {
    pub local_path: PathBuf,
    pub remote_key: String,
    pub kind: ArtifactKind,
}

pub struct TempArtifacts {
    dir: Option<TempDir>,
    root: PathBuf,
    artifacts: Vec<TempArtifact>,
}

impl TempArtifacts {
    /// Create a fresh run directory under `parent`.
    pub fn new_in(parent: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("vidopt-").tempdir_in(parent)?;
        let root = dir.path().to_path_buf();
        Ok(Self {
            dir: Some(dir),
            root,
            artifacts: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.root
    }

    /// Register `file_name` inside the run directory and return its path.
    pub fn register(
        &mut self,
        kind: ArtifactKind,
        file_name: &str,
        remote_key: impl Into<String>,
    ) -> PathBuf {
        let local_path = self.root.join(file_name);
        self.artifacts.push(TempArtifact {
            local_path: local_path.clone(),
            remote_key: remote_key.into(),
            kind,
        });
        local_path
    }

    pub fn artifacts(&self) -> &[TempArtifact] {
        &self.artifacts
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        for artifact in self.artifacts.iter().rev() {
            match std::fs::remove_file(&artifact.local_path) {
                Ok(()) => {
                    tracing::debug!(path = %artifact.local_path.display(), "Removed temp file");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %artifact.local_path.display(),
                        kind = ?artifact.kind,
                        error = %e,
                        "Failed to remove temp file"
                    );
                }
            }
        }

        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                tracing::warn!(path = %self.root.display(), error = %e, "Failed to remove run directory");
            }
        }
    }
}
