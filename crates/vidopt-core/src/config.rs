//! Configuration module
//!
//! The service is configured entirely from the process environment (a `.env` file is
//! honoured in development). `Config::from_env` fails when any required variable is
//! missing, which aborts startup before the storage client or HTTP listener exist.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const STORAGE_REGION: &str = "auto";
const FFMPEG_PATH: &str = "ffmpeg";
const FFPROBE_PATH: &str = "ffprobe";
const TOOL_TIMEOUT_SECS: u64 = 30 * 60;
const RATE_LIMIT_PER_SECOND: f64 = 1.0;
const RATE_LIMIT_BURST: u32 = 5;
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Variables that must be present for the service to start.
pub const REQUIRED_ENV_VARS: [&str; 6] = [
    "R2_ENDPOINT",
    "R2_BUCKET",
    "R2_ACCESS_KEY_ID",
    "R2_SECRET_ACCESS_KEY",
    "SERVER_URL",
    "VIDEO_OPTIMIZATION_API_KEY",
];

/// Object store connection settings.
#[derive(Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub local_path: Option<PathBuf>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("local_path", &self.local_path)
            .finish()
    }
}

/// External tool locations and limits used by the transcoding pipeline.
#[derive(Clone, Debug)]
pub struct ProcessingConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub tool_timeout: Duration,
    /// Parent directory for per-run working directories.
    pub work_dir: PathBuf,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: FFMPEG_PATH.to_string(),
            ffprobe_path: FFPROBE_PATH.to_string(),
            tool_timeout: Duration::from_secs(TOOL_TIMEOUT_SECS),
            work_dir: env::temp_dir(),
        }
    }
}

/// Per-client token bucket settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateLimitConfig {
    pub per_second: f64,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: RATE_LIMIT_PER_SECOND,
            burst: RATE_LIMIT_BURST,
        }
    }
}

/// Application configuration, built once at startup and shared by reference.
#[derive(Clone)]
pub struct Config {
    pub server_port: u16,
    pub server_url: String,
    pub api_key: String,
    pub environment: String,
    pub max_request_body_bytes: usize,
    pub storage: StorageConfig,
    pub processing: ProcessingConfig,
    pub rate_limit: RateLimitConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("server_url", &self.server_url)
            .field("api_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("max_request_body_bytes", &self.max_request_body_bytes)
            .field("storage", &self.storage)
            .field("processing", &self.processing)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as missing. All missing required variables are reported
    /// together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing = validate_env(&get);
        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }
        let required = |key: &str| get(key).unwrap_or_default();

        let environment = get("APP_ENV")
            .or_else(|| get("ENVIRONMENT"))
            .unwrap_or_else(|| "development".to_string());

        let backend = match get("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };
        let local_path = get("LOCAL_STORAGE_PATH").map(PathBuf::from);
        if backend == StorageBackend::Local && local_path.is_none() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
            ));
        }

        let storage = StorageConfig {
            backend,
            endpoint: required("R2_ENDPOINT"),
            bucket: required("R2_BUCKET"),
            region: get("STORAGE_REGION").unwrap_or_else(|| STORAGE_REGION.to_string()),
            access_key_id: required("R2_ACCESS_KEY_ID"),
            secret_access_key: required("R2_SECRET_ACCESS_KEY"),
            local_path,
        };

        let processing = ProcessingConfig {
            ffmpeg_path: get("FFMPEG_PATH").unwrap_or_else(|| FFMPEG_PATH.to_string()),
            ffprobe_path: get("FFPROBE_PATH").unwrap_or_else(|| FFPROBE_PATH.to_string()),
            tool_timeout: Duration::from_secs(parse_or("TOOL_TIMEOUT_SECS", &get, TOOL_TIMEOUT_SECS)?),
            work_dir: get("WORK_DIR").map(PathBuf::from).unwrap_or_else(env::temp_dir),
        };

        let rate_limit = RateLimitConfig {
            per_second: parse_or("RATE_LIMIT_PER_SECOND", &get, RATE_LIMIT_PER_SECOND)?,
            burst: parse_or("RATE_LIMIT_BURST", &get, RATE_LIMIT_BURST)?,
        };
        if rate_limit.per_second <= 0.0 || rate_limit.burst == 0 {
            return Err(anyhow::anyhow!(
                "RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be positive"
            ));
        }

        Ok(Config {
            server_port: parse_or("PORT", &get, SERVER_PORT)?,
            server_url: required("SERVER_URL"),
            api_key: required("VIDEO_OPTIMIZATION_API_KEY"),
            environment,
            max_request_body_bytes: parse_or("MAX_REQUEST_BODY_BYTES", &get, MAX_REQUEST_BODY_BYTES)?,
            storage,
            processing,
            rate_limit,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

/// Return the names of required variables that are absent or empty.
pub fn validate_env<F>(get: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_ENV_VARS
        .iter()
        .copied()
        .filter(|key| get(*key).is_none())
        .collect()
}

fn parse_or<T, F>(key: &str, get: &F, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid value, got '{}'", key, raw)),
        None => Ok(default),
    }
}
