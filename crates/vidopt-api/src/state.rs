//! Application state shared by handlers and middleware.

use std::sync::Arc;
use vidopt_core::Config;
use vidopt_infra::ClientRateLimiter;
use vidopt_processing::{ToolRunner, TranscodePipeline};
use vidopt_storage::Storage;

/// Credentials and origin checks.
#[derive(Clone)]
pub struct SecurityConfig {
    pub api_key: String,
    pub allowed_origin: String,
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: TranscodePipeline,
    pub storage: Arc<dyn Storage>,
    pub rate_limiter: ClientRateLimiter,
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(config: &Config, storage: Arc<dyn Storage>, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            pipeline: TranscodePipeline::new(storage.clone(), runner, &config.processing),
            storage,
            rate_limiter: ClientRateLimiter::new(&config.rate_limit),
            security: SecurityConfig {
                api_key: config.api_key.clone(),
                allowed_origin: config.server_url.clone(),
            },
        }
    }
}
