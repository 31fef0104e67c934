use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use vidopt_core::AppError;

const API_KEY_PREFIX: &str = "API-Key ";

/// Constant-time comparison of a presented key against the configured one.
fn secure_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Require `Authorization: API-Key <token>` matching the configured key.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(API_KEY_PREFIX));

    match token {
        Some(token) if secure_compare(token, &state.security.api_key) => next.run(request).await,
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "Unauthorized access attempt with invalid API key");
            HttpAppError(AppError::Unauthorized("invalid API key".to_string())).into_response()
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "Unauthorized access attempt missing API key");
            HttpAppError(AppError::Unauthorized("missing API key".to_string())).into_response()
        }
    }
}
