//! Per-client rate limiting

mod limiter;

pub use limiter::{ClientRateLimiter, TokenBucket};
