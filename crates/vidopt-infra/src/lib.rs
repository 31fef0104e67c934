//! Vidopt Infrastructure Library
//!
//! Shared infrastructure used by the HTTP service:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Per-client rate limiting

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{get_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{ClientRateLimiter, TokenBucket};
