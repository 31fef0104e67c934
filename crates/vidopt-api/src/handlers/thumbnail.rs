use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use vidopt_core::{AppError, MediaDescriptor};

#[derive(Debug, Deserialize)]
pub struct ThumbnailRequest {
    #[serde(default)]
    pub filename: String,
}

pub async fn generate_thumbnail(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ThumbnailRequest>,
) -> Result<Json<MediaDescriptor>, HttpAppError> {
    if request.filename.is_empty() {
        return Err(AppError::InvalidArgument("filename is required".to_string()).into());
    }

    let descriptor = state.pipeline.thumbnail(&request.filename).await?;

    Ok(Json(descriptor))
}
