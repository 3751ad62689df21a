// Dashboard handler
// Video listing plus the signed-in user's stats

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde::Serialize;

use crate::{
    app::AppState,
    handlers::{videos::VideoInfo, ApiResponse},
    middleware::auth::AuthenticatedUser,
    models::Video,
    utils::{ServiceError, ServiceResult},
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub balance: i32,
    pub is_active: bool,
    pub referral_code: String,
    pub referral_count: i64,
    pub registration_fee: i32,
    pub videos: Vec<VideoInfo>,
}

/// GET /v1/dashboard - Videos newest first plus referral stats
pub async fn dashboard(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.identity_service.find_by_id(auth_user.user_id).await?;
    let referral_count = state.identity_service.referral_count(&user).await?;
    let videos = list_videos(&state).await?;

    let response = ApiResponse {
        success: true,
        data: Some(DashboardResponse {
            balance: user.balance,
            is_active: user.is_active,
            referral_code: user.referral_code,
            referral_count,
            registration_fee: crate::app_config::config().rewards.registration_fee,
            videos,
        }),
        message: "OK".to_string(),
    };

    Ok(Json(response))
}

async fn list_videos(state: &AppState) -> ServiceResult<Vec<VideoInfo>> {
    let mut conn = state
        .diesel_pool
        .get()
        .await
        .map_err(|e| ServiceError::Pool(e.to_string()))?;

    let videos = Video::list_recent(&mut conn).await?;
    Ok(videos.into_iter().map(VideoInfo::from).collect())
}
