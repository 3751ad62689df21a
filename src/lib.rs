// Library exports for the Wari Rewards backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, CONFIG};
pub use db::{DieselDatabaseConfig, DieselPool};
pub use middleware::auth_middleware;
pub use middleware::AuthenticatedUser;
pub use models::{Payment, PaymentStatus, ProviderTag, User, Video, VideoProvider, View};
pub use services::{
    AccessTokenClaims, ConfirmationOutcome, IdentityService, JwtError, JwtService,
    MChainProvider, OrangeProvider, PaymentFlowService, PaymentProvider, RegistrationInput,
    RewardService,
};
pub use utils::{ServiceError, ServiceResult};

use std::sync::Arc;

/// Initialize application state: config, database pool, migrations,
/// services
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    use tracing::info;

    // Load environment
    dotenv::dotenv().ok();

    let _config = app_config::config();

    // Initialize database pool
    info!("Initializing database pool...");
    let db_config = db::DieselDatabaseConfig::default();
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    // Run migrations if enabled
    if migrations::should_run_migrations() {
        info!("Running embedded migrations...");
        migrations::run_migrations()
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    // Initialize services
    let jwt_service = Arc::new(JwtService::from_env());
    let identity_service = Arc::new(IdentityService::new(diesel_pool.clone()));
    let reward_service = Arc::new(RewardService::new(diesel_pool.clone()));

    let providers: Vec<Box<dyn PaymentProvider>> = vec![
        Box::new(OrangeProvider::from_env()),
        Box::new(MChainProvider::from_env()),
    ];
    let payment_flow_service = Arc::new(PaymentFlowService::new(diesel_pool.clone(), providers));

    Ok(AppState {
        diesel_pool,
        jwt_service,
        identity_service,
        payment_flow_service,
        reward_service,
        max_connections,
    })
}

/// Assemble the full API router
pub fn build_router(state: AppState) -> axum::Router {
    use axum::routing::get;
    use tower_http::{cors::CorsLayer, trace::TraceLayer};

    axum::Router::new()
        .nest("/v1/auth", handlers::auth_routes(state.clone()))
        .nest("/v1/payments", handlers::payment_routes())
        .nest("/v1/webhooks", handlers::webhook_routes())
        .nest("/v1/videos", handlers::video_routes(state.clone()))
        .nest("/v1/dashboard", handlers::dashboard_routes(state.clone()))
        .nest("/v1/admin", handlers::admin_routes())
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let timestamp = chrono::Utc::now().to_rfc3339();

    let (overall_healthy, postgres_health) = match db::check_diesel_health(&state.diesel_pool).await
    {
        Ok(_) => (
            true,
            serde_json::json!({
                "status": "healthy",
                "max_connections": state.max_connections,
                "error": null
            }),
        ),
        Err(e) => (
            false,
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            }),
        ),
    };

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "wari-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
