//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidopt_core::Config;
use vidopt_processing::ProcessRunner;

/// Initialize telemetry, storage and the pipeline, and build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    vidopt_infra::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage.backend,
        "Configuration loaded"
    );

    let storage = vidopt_storage::create_storage(&config)
        .await
        .context("Failed to initialize storage")?;

    let runner = Arc::new(ProcessRunner::new(config.processing.tool_timeout));
    let state = Arc::new(AppState::new(&config, storage, runner));

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
