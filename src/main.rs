use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wari_backend::{build_router, db, initialize_app_state};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables before the config snapshot
    dotenv::dotenv().ok();

    let config = wari_backend::app_config::config();
    let bind_address = config.bind_address.clone();

    // Initialize tracing; RUST_LOG in the process env wins over config
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Wari backend on {} ({})",
        bind_address, config.environment
    );
    info!(
        "Database URL: {}",
        db::mask_connection_string(&config.database_url)
    );

    let state = match initialize_app_state().await {
        Ok(state) => {
            info!("Application state initialized successfully");
            state
        },
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(std::io::Error::other(format!(
                "Initialization failed: {}",
                e
            )));
        },
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app).await
}
