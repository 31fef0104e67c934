//! API key authentication integration tests.

mod helpers;

use serde_json::{json, Value};

#[tokio::test]
async fn test_missing_key_is_unauthorized() {
    let app = helpers::setup_test_app().await;

    let res = app
        .client()
        .post("/thumbnail")
        .json(&json!({ "filename": "clip.mp4" }))
        .await;

    assert_eq!(res.status_code(), 401);
    let body: Value = res.json();
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(app.runner.steps().is_empty());
}

#[tokio::test]
async fn test_wrong_key_is_unauthorized_regardless_of_length() {
    let app = helpers::setup_test_app().await;

    for presented in ["API-Key wrong", "API-Key test-api-kez", "API-Key test-api-key-longer"] {
        let res = app
            .client()
            .post("/delete")
            .add_header("Authorization", presented)
            .json(&json!({ "filenames": ["a.png"] }))
            .await;
        assert_eq!(res.status_code(), 401, "{}", presented);
    }
}

#[tokio::test]
async fn test_wrong_scheme_is_unauthorized() {
    let app = helpers::setup_test_app().await;

    let res = app
        .client()
        .post("/optimize")
        .add_header("Authorization", format!("Bearer {}", helpers::TEST_API_KEY))
        .json(&json!({ "filename": "clip.mp4" }))
        .await;

    assert_eq!(res.status_code(), 401);
}

#[tokio::test]
async fn test_valid_key_reaches_handler() {
    let app = helpers::setup_test_app().await;

    let res = app
        .client()
        .post("/thumbnail")
        .add_header("Authorization", helpers::auth_header())
        .json(&json!({ "filename": "" }))
        .await;

    // Past auth, rejected by request validation.
    assert_eq!(res.status_code(), 400);
    let body: Value = res.json();
    assert_eq!(body["error"], "filename is required");
}

#[tokio::test]
async fn test_health_needs_no_key() {
    let app = helpers::setup_test_app().await;
    assert_eq!(app.client().get("/health").await.status_code(), 200);
}
