use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use vidopt_core::{AppError, PipelineRequest, PipelineResult};

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub filename: String,
    /// `format` (default `webm`) and `resolution` (e.g. `720p`).
    #[serde(default)]
    pub options: HashMap<String, String>,
}

/// Re-encode a stored video and produce its thumbnail.
pub async fn optimize_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<OptimizeRequest>,
) -> Result<Json<PipelineResult>, HttpAppError> {
    if request.filename.is_empty() {
        return Err(AppError::InvalidArgument("filename is required".to_string()).into());
    }

    let pipeline_request = PipelineRequest {
        source_key: request.filename,
        options: request.options,
    };
    let result = state.pipeline.optimize(&pipeline_request).await?;

    Ok(Json(result))
}
