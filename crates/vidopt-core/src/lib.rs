//! Vidopt Core Library
//!
//! Configuration, the service error taxonomy and the domain models shared by the
//! storage, processing and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{validate_env, Config, ProcessingConfig, RateLimitConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{MediaDescriptor, PipelineRequest, PipelineResult};
pub use storage_types::StorageBackend;
