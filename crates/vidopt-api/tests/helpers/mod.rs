//! Test helpers: build AppState and router for integration tests.
//!
//! Storage is a `LocalStorage` rooted in a temp dir and ffmpeg/ffprobe are replaced by
//! a scripted runner, so no external binaries or network are needed.

#![allow(dead_code)]

pub mod runner;
pub mod storage;

use axum_test::TestServer;
use runner::{ScriptedRunner, Step};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use storage::FailingDeletes;
use tempfile::TempDir;
use vidopt_api::setup::routes;
use vidopt_api::AppState;
use vidopt_core::Config;
use vidopt_storage::{LocalStorage, Storage};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_ORIGIN: &str = "https://app.example.com";

pub fn auth_header() -> String {
    format!("API-Key {}", TEST_API_KEY)
}

/// Knobs for a test application.
pub struct TestOptions {
    pub rate_limit_burst: u32,
    pub fail_step: Option<Step>,
    pub fail_delete_key: Option<&'static str>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            rate_limit_burst: 1000,
            fail_step: None,
            fail_delete_key: None,
        }
    }
}

/// Test application: server plus the directories it works in.
pub struct TestApp {
    pub server: TestServer,
    pub objects_dir: PathBuf,
    pub work_dir: PathBuf,
    pub runner: Arc<ScriptedRunner>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Place an object directly in the store.
    pub fn put_object(&self, key: &str, data: &[u8]) {
        std::fs::write(self.objects_dir.join(key), data).expect("write object");
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.objects_dir.join(key).exists()
    }

    pub fn work_dir_is_empty(&self) -> bool {
        std::fs::read_dir(&self.work_dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true)
    }
}

fn test_config(objects_dir: &std::path::Path, work_dir: &std::path::Path, burst: u32) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("R2_ENDPOINT", "http://localhost:9000".to_string()),
        ("R2_BUCKET", "videos".to_string()),
        ("R2_ACCESS_KEY_ID", "test-key-id".to_string()),
        ("R2_SECRET_ACCESS_KEY", "test-secret".to_string()),
        ("SERVER_URL", TEST_ORIGIN.to_string()),
        ("VIDEO_OPTIMIZATION_API_KEY", TEST_API_KEY.to_string()),
        ("STORAGE_BACKEND", "local".to_string()),
        ("LOCAL_STORAGE_PATH", objects_dir.display().to_string()),
        ("WORK_DIR", work_dir.display().to_string()),
        ("RATE_LIMIT_BURST", burst.to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let objects_dir = temp_dir.path().join("objects");
    let work_dir = temp_dir.path().join("work");
    let config = test_config(&objects_dir, &work_dir, options.rate_limit_burst);

    let local = LocalStorage::new(&objects_dir, "http://localhost:9000/videos".to_string())
        .await
        .expect("Failed to create local storage");
    let storage: Arc<dyn Storage> = match options.fail_delete_key {
        Some(key) => Arc::new(FailingDeletes::new(local, key)),
        None => Arc::new(local),
    };

    let runner = Arc::new(match options.fail_step {
        Some(step) => ScriptedRunner::failing(step),
        None => ScriptedRunner::default(),
    });

    let state = Arc::new(AppState::new(&config, storage, runner.clone()));
    let router = routes::setup_routes(&config, state);
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        objects_dir,
        work_dir,
        runner,
        _temp_dir: temp_dir,
    }
}
