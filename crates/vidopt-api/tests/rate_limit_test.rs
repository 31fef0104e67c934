//! Per-client rate limit integration tests.

mod helpers;

use helpers::TestOptions;
use serde_json::Value;

async fn limited_app() -> helpers::TestApp {
    helpers::setup_test_app_with(TestOptions {
        rate_limit_burst: 5,
        ..Default::default()
    })
    .await
}

#[tokio::test]
async fn test_sixth_immediate_request_is_rejected() {
    let app = limited_app().await;

    for _ in 0..5 {
        let res = app
            .client()
            .get("/health")
            .add_header("X-Forwarded-For", "198.51.100.1")
            .await;
        assert_eq!(res.status_code(), 200);
    }

    let res = app
        .client()
        .get("/health")
        .add_header("X-Forwarded-For", "198.51.100.1")
        .await;
    assert_eq!(res.status_code(), 429);
    assert_eq!(res.headers().get("retry-after").unwrap(), "1");
    let body: Value = res.json();
    assert_eq!(body["error"], "Too Many Requests");
    assert_eq!(body["code"], "RATE_LIMITED");
}

#[tokio::test]
async fn test_clients_keyed_by_first_forwarded_address() {
    let app = limited_app().await;

    for _ in 0..5 {
        app.client()
            .get("/health")
            .add_header("X-Forwarded-For", "198.51.100.1, 10.0.0.1")
            .await;
    }

    // Same client behind a different proxy chain.
    let res = app
        .client()
        .get("/health")
        .add_header("X-Forwarded-For", "198.51.100.1, 10.0.0.2")
        .await;
    assert_eq!(res.status_code(), 429);

    let res = app
        .client()
        .get("/health")
        .add_header("X-Forwarded-For", "198.51.100.2")
        .await;
    assert_eq!(res.status_code(), 200);
}

#[tokio::test]
async fn test_rate_limit_applies_before_auth() {
    let app = limited_app().await;

    for _ in 0..5 {
        let res = app
            .client()
            .post("/delete")
            .add_header("X-Forwarded-For", "198.51.100.9")
            .await;
        assert_eq!(res.status_code(), 401);
    }

    let res = app
        .client()
        .post("/delete")
        .add_header("X-Forwarded-For", "198.51.100.9")
        .await;
    assert_eq!(res.status_code(), 429);
}
