#![cfg(unix)]

use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vidopt_core::{PipelineRequest, ProcessingConfig};
use vidopt_processing::{ProcessRunner, TranscodePipeline};
use vidopt_storage::LocalStorage;

/// Stand-in encoder: creates its output file, marks that it started, then hangs.
fn slow_encoder(dir: &TempDir, marker: &std::path::Path) -> std::path::PathBuf {
    let script = dir.path().join("slow-ffmpeg");
    let body = format!(
        "#!/bin/sh\nfor last; do :; done\n: > \"$last\"\n: > '{}'\nexec sleep 30\n",
        marker.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, Permissions::from_mode(0o755)).unwrap();
    script
}

#[tokio::test]
async fn test_dropped_run_removes_temp_files() {
    let root = TempDir::new().unwrap();
    let objects = root.path().join("objects");
    let work_dir = root.path().join("work");
    let storage = LocalStorage::new(&objects, "http://store/videos".to_string())
        .await
        .unwrap();
    std::fs::write(objects.join("clip.mp4"), b"source-video").unwrap();

    let marker = root.path().join("encoder-started");
    let config = ProcessingConfig {
        ffmpeg_path: slow_encoder(&root, &marker).display().to_string(),
        ffprobe_path: "ffprobe".to_string(),
        tool_timeout: Duration::from_secs(60),
        work_dir: work_dir.clone(),
    };
    let pipeline = TranscodePipeline::new(
        Arc::new(storage),
        Arc::new(ProcessRunner::new(config.tool_timeout)),
        &config,
    );

    let request = PipelineRequest::new("clip.mp4");
    let outcome = tokio::time::timeout(Duration::from_secs(2), pipeline.optimize(&request)).await;

    assert!(outcome.is_err(), "run should still be transcoding");
    assert!(marker.exists());
    assert_eq!(std::fs::read_dir(&work_dir).unwrap().count(), 0);
}
