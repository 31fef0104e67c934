use axum::{http::header, response::IntoResponse};

pub async fn health_check() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "OK\n")
}
