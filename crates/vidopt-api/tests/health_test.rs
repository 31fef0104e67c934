//! Health endpoint and request id integration tests.

mod helpers;

#[tokio::test]
async fn test_health_returns_plain_ok() {
    let app = helpers::setup_test_app().await;

    let res = app.client().get("/health").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.text(), "OK\n");
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/plain"
    );
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = helpers::setup_test_app().await;

    let res = app.client().get("/health").await;
    assert!(res.headers().get("x-request-id").is_some());

    let res = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "upstream-42")
        .await;
    assert_eq!(res.headers().get("x-request-id").unwrap(), "upstream-42");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = helpers::setup_test_app().await;
    let res = app.client().get("/missing").await;
    assert_eq!(res.status_code(), 404);
}
