//! Vidopt API Library
//!
//! HTTP handlers, middleware and application setup for the video optimization
//! service.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
