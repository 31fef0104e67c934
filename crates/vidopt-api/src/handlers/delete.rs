use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vidopt_core::AppError;

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub filenames: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Delete objects in order, stopping at the first failure.
///
/// Objects deleted before the failure stay deleted.
pub async fn delete_files(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteRequest>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    if request.filenames.is_empty() {
        return Err(
            AppError::InvalidArgument("at least one filename is required".to_string()).into(),
        );
    }

    for filename in &request.filenames {
        tracing::info!(filename = %filename, "Deleting file from storage");
        state.storage.delete(filename).await.map_err(|e| {
            tracing::error!(filename = %filename, error = %e, "Failed to delete file from storage");
            AppError::DeleteFailed(format!("{}: {}", filename, e))
        })?;
    }

    tracing::info!(count = request.filenames.len(), "Files deleted");

    Ok(Json(DeleteResponse {
        message: "Files deleted".to_string(),
    }))
}
