// Video handlers
// Public listing, detail view, reward claims, and the gated admin insert

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use subtle::ConstantTimeEq;
use validator::Validate;

use crate::{
    app::AppState,
    handlers::ApiResponse,
    middleware::auth::AuthenticatedUser,
    models::{video::NewVideo, Video, VideoProvider, View},
    utils::{ServiceError, ServiceResult},
};

#[derive(Debug, Serialize)]
pub struct VideoInfo {
    pub video_id: i32,
    pub title: String,
    pub provider: String,
    pub embed_url: String,
}

impl From<Video> for VideoInfo {
    fn from(video: Video) -> Self {
        Self {
            video_id: video.id,
            title: video.title,
            provider: video.provider,
            embed_url: video.embed_url,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct AddVideoRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    /// One of "youtube" or "tiktok"
    pub provider: String,

    #[validate(length(min = 1, message = "embed_url must not be empty"))]
    pub embed_url: String,
}

async fn get_conn(state: &AppState) -> ServiceResult<crate::db::PooledConn<'_>> {
    state
        .diesel_pool
        .get()
        .await
        .map_err(|e| ServiceError::Pool(e.to_string()))
}

/// GET /v1/videos - All videos, most recent first (public)
pub async fn list_videos(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = get_conn(&state).await?;
    let videos = Video::list_recent(&mut conn).await?;

    let response = ApiResponse {
        success: true,
        data: Some(
            videos
                .into_iter()
                .map(VideoInfo::from)
                .collect::<Vec<_>>(),
        ),
        message: "OK".to_string(),
    };

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: VideoInfo,
    /// Whether the signed-in user has already claimed this video's reward
    pub already_rewarded: bool,
}

/// GET /v1/videos/{video_id} - Video detail for the embedded player
pub async fn video_detail(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(video_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = get_conn(&state).await?;
    let video = Video::find_by_id(&mut conn, video_id).await?;
    let already_rewarded = View::is_rewarded(&mut conn, auth_user.user_id, video_id).await?;

    let response = ApiResponse {
        success: true,
        data: Some(VideoDetail {
            video: VideoInfo::from(video),
            already_rewarded,
        }),
        message: "OK".to_string(),
    };

    Ok(Json(response))
}

/// POST /v1/videos/{video_id}/claim - Grant the one-time view reward.
/// Wire format matches the provider contract: 200 {"status":"ok",
/// "new_balance":N} or 400 {"status":"already_rewarded"}.
pub async fn claim_video_reward(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(video_id): Path<i32>,
) -> axum::response::Response {
    match state
        .reward_service
        .claim_video_reward(auth_user.user_id, video_id)
        .await
    {
        Ok(new_balance) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "new_balance": new_balance})),
        )
            .into_response(),
        Err(ServiceError::AlreadyRewarded) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "already_rewarded"})),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /v1/admin/videos - Insert a video. Gated behind the static admin
/// token carried in the `x-admin-token` header.
pub async fn admin_add_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddVideoRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let presented = headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    // Constant-time comparison against the configured token
    let authorized: bool = presented
        .as_bytes()
        .ct_eq(crate::app_config::config().admin_token.as_bytes())
        .into();

    if !authorized {
        return Err(ServiceError::Unauthenticated);
    }

    req.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;

    if !req.embed_url.starts_with("http://") && !req.embed_url.starts_with("https://") {
        return Err(ServiceError::Validation(
            "embed_url must be an http(s) URL".to_string(),
        ));
    }

    let provider = VideoProvider::from_str(&req.provider)
        .map_err(ServiceError::Validation)?;

    let mut conn = get_conn(&state).await?;
    let video = Video::create(
        &mut conn,
        NewVideo {
            title: req.title,
            provider: provider.as_str().to_string(),
            embed_url: req.embed_url,
        },
    )
    .await?;

    tracing::info!(video_id = video.id, provider = %video.provider, "Video added");

    let response = ApiResponse {
        success: true,
        data: Some(VideoInfo::from(video)),
        message: "Video added".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
