use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use vidopt_core::Config;
use vidopt_infra::{get_request_id, request_id_middleware};

/// Setup all application routes
///
/// Layer order, outermost first: request id, tracing, CORS, rate limit, body limit.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let public_routes = Router::new().route("/health", get(handlers::health::health_check));

    let protected_routes = Router::new()
        .route("/optimize", post(handlers::optimize::optimize_video))
        .route("/thumbnail", post(handlers::thumbnail::generate_thumbnail))
        .route("/delete", post(handlers::delete::delete_files))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http().make_span_with(
        |request: &axum::http::Request<axum::body::Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %get_request_id(request).unwrap_or_default(),
            )
        },
    );

    public_routes
        .merge(protected_routes)
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::rate_limit_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::cors_middleware,
        ))
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
