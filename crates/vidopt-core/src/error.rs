//! Error types module
//!
//! `AppError` is the service-level error taxonomy. Library crates keep their own
//! typed errors (storage, tool, pipeline) and are mapped into `AppError` at the HTTP
//! boundary, where `ErrorMetadata` decides status code, client message and log level.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client misbehaviour such as bad credentials or throttling
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TRANSCODE_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details must never reach the client
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Transcode failed: {0}")]
    TranscodeFailed(String),

    #[error("Thumbnail generation failed: {0}")]
    ThumbnailFailed(String),

    #[error("Thumbnail conversion failed: {0}")]
    ThumbnailConvertFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Stat failed: {0}")]
    StatFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidArgument(format!("JSON parsing error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::InvalidArgument(_) => (400, "INVALID_ARGUMENT", false, false, LogLevel::Debug),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, true, LogLevel::Warn),
        AppError::RateLimited { .. } => (429, "RATE_LIMITED", true, false, LogLevel::Warn),
        AppError::DownloadFailed(_) => (500, "DOWNLOAD_FAILED", true, true, LogLevel::Error),
        AppError::TranscodeFailed(_) => (500, "TRANSCODE_FAILED", false, true, LogLevel::Error),
        AppError::ThumbnailFailed(_) => (500, "THUMBNAIL_FAILED", false, true, LogLevel::Error),
        AppError::ThumbnailConvertFailed(_) => (
            500,
            "THUMBNAIL_CONVERT_FAILED",
            false,
            true,
            LogLevel::Error,
        ),
        AppError::UploadFailed(_) => (500, "UPLOAD_FAILED", true, true, LogLevel::Error),
        AppError::StatFailed(_) => (500, "STAT_FAILED", true, true, LogLevel::Error),
        AppError::DeleteFailed(_) => (500, "DELETE_FAILED", true, true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "InvalidArgument",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::RateLimited { .. } => "RateLimited",
            AppError::DownloadFailed(_) => "DownloadFailed",
            AppError::TranscodeFailed(_) => "TranscodeFailed",
            AppError::ThumbnailFailed(_) => "ThumbnailFailed",
            AppError::ThumbnailConvertFailed(_) => "ThumbnailConvertFailed",
            AppError::UploadFailed(_) => "UploadFailed",
            AppError::StatFailed(_) => "StatFailed",
            AppError::DeleteFailed(_) => "DeleteFailed",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Full internal message, for logs and non-production responses.
    pub fn detailed_message(&self) -> String {
        self.to_string()
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidArgument(msg) => msg.clone(),
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::RateLimited { .. } => "Too Many Requests".to_string(),
            AppError::DownloadFailed(_) => "failed to download source file".to_string(),
            AppError::TranscodeFailed(_) => "video optimization failed".to_string(),
            AppError::ThumbnailFailed(_) => "thumbnail generation failed".to_string(),
            AppError::ThumbnailConvertFailed(_) => "thumbnail conversion failed".to_string(),
            AppError::UploadFailed(_) => "failed to upload file".to_string(),
            AppError::StatFailed(_) => "failed to get file info".to_string(),
            AppError::DeleteFailed(_) => "failed to delete object".to_string(),
            AppError::Internal(_) => "internal server error".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }
}
