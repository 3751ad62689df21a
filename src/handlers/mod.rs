// HTTP handlers for the Wari backend

pub mod auth;
pub mod dashboard;
pub mod payments;
pub mod videos;

use crate::app::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use serde::Serialize;

/// Standard success envelope shared by JSON handlers
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

// Authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth_middleware,
        ));

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(protected)
}

// Payment routes: checkout, provider dispatch
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout/{user_id}", post(payments::open_checkout))
        .route("/pay/orange/{payment_id}", post(payments::pay_orange))
        .route("/pay/mchain/{payment_id}", post(payments::pay_mchain))
}

// Inbound provider callbacks, gated by the shared webhook secret
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/payment/{payment_id}", post(payments::confirm_payment))
}

// Video routes: public listing plus authenticated detail/claim
pub fn video_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/{video_id}", get(videos::video_detail))
        .route("/{video_id}/claim", post(videos::claim_video_reward))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth_middleware,
        ));

    Router::new()
        .route("/", get(videos::list_videos))
        .merge(protected)
}

// Dashboard (authenticated)
pub fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth_middleware,
        ))
}

// Admin routes, gated by the static admin token inside the handler
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/videos", post(videos::admin_add_video))
}
