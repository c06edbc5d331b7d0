//! Integration tests for bearer-token authentication.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_is_public() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], "memory");
    assert_eq!(response.data()["store_healthy"], true);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/seats", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error_code(), "AUTHENTICATION");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/me", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = helpers::sign(
        helpers::TEST_KID,
        json!({
            "uid": "alice",
            "iss": helpers::ISSUER,
            "exp": chrono::Utc::now().timestamp() - 3600,
        }),
    );

    let response = app.me(&token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_key_id_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = helpers::sign(
        "retired-key",
        json!({
            "uid": "alice",
            "iss": helpers::ISSUER,
            "exp": chrono::Utc::now().timestamp() + 600,
        }),
    );

    let response = app.me(&token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_issuer_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = helpers::sign(
        helpers::TEST_KID,
        json!({
            "uid": "alice",
            "iss": "https://elsewhere.test",
            "exp": chrono::Utc::now().timestamp() + 600,
        }),
    );

    let response = app.me(&token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_first_request_registers_employee() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");

    let response = app.me(&token).await;

    assert_eq!(response.status, StatusCode::OK);
    let profile = response.data();
    assert_eq!(profile["employee_id"], "alice");
    assert_eq!(profile["name"], "ALICE");
    assert_eq!(profile["email"], "alice@example.com");
    assert_eq!(profile["active_seat"], serde_json::Value::Null);
    assert_eq!(profile["tokens_spent"], 0);
    assert_eq!(profile["cooldown_remaining_seconds"], 0);
}
