// Integration tests for video reward claims

use axum::http::StatusCode;
use serial_test::serial;

mod common;
use common::setup_test_app;

#[tokio::test]
#[serial]
async fn test_claim_rewards_once_per_video() {
    let Some(app) = setup_test_app().await else { return };

    let (_, email, _) = app.register_user(None).await;
    let token = app.login(&email).await;
    let video_id = app.add_video("Claim once").await;

    // First claim pays the per-video reward
    let (status, body) = app
        .post_authed(&format!("/v1/videos/{}/claim", video_id), &token, None)
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"].as_str().unwrap(), "ok");
    assert_eq!(body["new_balance"].as_i64().unwrap(), 250);

    // Second claim for the same video fails and changes nothing
    let (status, body) = app
        .post_authed(&format!("/v1/videos/{}/claim", video_id), &token, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    assert_eq!(body["status"].as_str().unwrap(), "already_rewarded");

    assert_eq!(app.balance(&token).await, 250);
}

#[tokio::test]
#[serial]
async fn test_claims_accumulate_across_videos() {
    let Some(app) = setup_test_app().await else { return };

    let (_, email, _) = app.register_user(None).await;
    let token = app.login(&email).await;
    let first = app.add_video("First video").await;
    let second = app.add_video("Second video").await;

    let (status, body) = app
        .post_authed(&format!("/v1/videos/{}/claim", first), &token, None)
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["new_balance"].as_i64().unwrap(), 250);

    let (status, body) = app
        .post_authed(&format!("/v1/videos/{}/claim", second), &token, None)
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["new_balance"].as_i64().unwrap(), 500);
}

#[tokio::test]
#[serial]
async fn test_claim_missing_video() {
    let Some(app) = setup_test_app().await else { return };

    let (_, email, _) = app.register_user(None).await;
    let token = app.login(&email).await;

    let (status, body) = app
        .post_authed("/v1/videos/999999999/claim", &token, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "body: {}", body);
}

#[tokio::test]
#[serial]
async fn test_admin_add_video_requires_token() {
    let Some(app) = setup_test_app().await else { return };

    let (status, body) = app
        .post_json(
            "/v1/admin/videos",
            serde_json::json!({
                "title": "Unauthorized",
                "provider": "youtube",
                "embed_url": "https://www.youtube.com/embed/x",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "body: {}", body);
}

#[tokio::test]
#[serial]
async fn test_admin_add_video_rejects_wrong_token() {
    let Some(app) = setup_test_app().await else { return };

    let (status, body) = app
        .post_with_headers(
            "/v1/admin/videos",
            &[("x-admin-token", "definitely-not-the-token")],
            Some(serde_json::json!({
                "title": "Unauthorized",
                "provider": "youtube",
                "embed_url": "https://www.youtube.com/embed/x",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "body: {}", body);
    assert_eq!(body["error"]["code"].as_str().unwrap(), "UNAUTHENTICATED");
}

#[tokio::test]
#[serial]
async fn test_video_listing_most_recent_first() {
    let Some(app) = setup_test_app().await else { return };

    let older = app.add_video("Older video").await;
    let newer = app.add_video("Newer video").await;

    let (status, body) = app.get("/v1/videos").await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["video_id"].as_i64().unwrap())
        .collect();

    let pos_newer = ids.iter().position(|&id| id == newer).unwrap();
    let pos_older = ids.iter().position(|&id| id == older).unwrap();
    assert!(pos_newer < pos_older);
}
