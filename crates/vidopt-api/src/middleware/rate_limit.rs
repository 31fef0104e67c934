use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::ip_extraction::client_key;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use vidopt_core::AppError;

/// Per-client token bucket check applied to every route.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(request.headers(), peer.as_ref());

    match state.rate_limiter.check(&key).await {
        Ok(()) => next.run(request).await,
        Err(wait) => {
            tracing::warn!(client = %key, retry_after_ms = wait.as_millis() as u64, "Rate limit exceeded");
            let retry_after_secs = wait.as_secs_f64().ceil().max(1.0) as u64;
            HttpAppError(AppError::RateLimited { retry_after_secs }).into_response()
        }
    }
}
