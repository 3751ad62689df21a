// Integration tests for user registration and login

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

mod common;
use common::{setup_test_app, unique_email};

#[tokio::test]
#[serial]
async fn test_successful_registration() {
    let Some(app) = setup_test_app().await else { return };

    let email = unique_email("newuser");
    let (status, body) = app
        .post_json(
            "/v1/auth/register",
            json!({
                "email": email.clone(),
                "password": "SecureP@ssw0rd123!",
                "phone": "0700000000",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["data"]["email"].as_str().unwrap(), email);

    // Referral code is non-empty and short
    let code = body["data"]["referral_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);

    // Fee the client is expected to pay at checkout
    assert!(body["data"]["registration_fee"].as_i64().unwrap() > 0);
}

#[tokio::test]
#[serial]
async fn test_registration_with_existing_email() {
    let Some(app) = setup_test_app().await else { return };

    let email = unique_email("duplicate");
    let payload = json!({
        "email": email.clone(),
        "password": "SecureP@ssw0rd123!",
        "phone": "0700000000",
    });

    let (status, _) = app.post_json("/v1/auth/register", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same address with different casing still collides
    let upper = json!({
        "email": email.to_uppercase(),
        "password": "SecureP@ssw0rd123!",
        "phone": "0700000000",
    });
    let (status, body) = app.post_json("/v1/auth/register", upper).await;
    assert_eq!(status, StatusCode::CONFLICT, "body: {}", body);
    assert_eq!(body["error"]["code"].as_str().unwrap(), "DUPLICATE_EMAIL");

    // First user is unaffected and can still log in
    let token = app.login(&email).await;
    assert!(!token.is_empty());
}

#[tokio::test]
#[serial]
async fn test_registration_validation() {
    let Some(app) = setup_test_app().await else { return };

    let (status, body) = app
        .post_json(
            "/v1/auth/register",
            json!({
                "email": "not-an-email",
                "password": "SecureP@ssw0rd123!",
                "phone": "0700000000",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    assert_eq!(body["error"]["code"].as_str().unwrap(), "VALIDATION_ERROR");
}

#[tokio::test]
#[serial]
async fn test_referral_codes_are_unique() {
    let Some(app) = setup_test_app().await else { return };

    let (_, _, code_a) = app.register_user(None).await;
    let (_, _, code_b) = app.register_user(None).await;
    assert_ne!(code_a, code_b);
}

#[tokio::test]
#[serial]
async fn test_login_with_wrong_password() {
    let Some(app) = setup_test_app().await else { return };

    let (_, email, _) = app.register_user(None).await;

    let (status, body) = app
        .post_json(
            "/v1/auth/login",
            json!({"email": email, "password": "WrongPassword!"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "body: {}", body);
    assert_eq!(
        body["error"]["code"].as_str().unwrap(),
        "INVALID_CREDENTIALS"
    );
}

#[tokio::test]
#[serial]
async fn test_protected_route_requires_token() {
    let Some(app) = setup_test_app().await else { return };

    let (status, body) = app.get("/v1/dashboard").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "body: {}", body);
    assert_eq!(body["error"]["code"].as_str().unwrap(), "UNAUTHENTICATED");
}
