// Migration runner for the Wari backend
// Embedded in the application binary so containers need no diesel CLI

use diesel::Connection;
use diesel::PgConnection;
use diesel_migrations::MigrationHarness;
use std::error::Error;
use tracing::{debug, info};

use crate::db::MIGRATIONS;

/// Whether embedded migrations should run at startup
pub fn should_run_migrations() -> bool {
    !crate::app_config::config().disable_embedded_migrations
}

/// Run all pending Diesel migrations
/// Returns the number of migrations applied
pub async fn run_migrations() -> Result<usize, Box<dyn Error + Send + Sync>> {
    info!("[MIGRATIONS] Starting Diesel migration process...");

    // MigrationHarness is sync, so run on a blocking task with its own connection
    let database_url = crate::app_config::config().database_url.clone();

    let applied_count =
        tokio::task::spawn_blocking(move || -> Result<usize, Box<dyn Error + Send + Sync>> {
            let mut conn = PgConnection::establish(&database_url)
                .map_err(|e| format!("Failed to establish sync connection: {}", e))?;

            let pending = conn
                .pending_migrations(MIGRATIONS)
                .map_err(|e| format!("Failed to check pending migrations: {}", e))?;

            if pending.is_empty() {
                debug!("[MIGRATIONS] No pending migrations found");
                return Ok(0);
            }

            info!("[MIGRATIONS] Found {} pending migrations", pending.len());

            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| format!("Failed to run migrations: {}", e))?;

            for migration in &applied {
                debug!("[MIGRATIONS] Applied migration: {}", migration);
            }

            Ok(applied.len())
        })
        .await
        .map_err(|e| format!("Migration task panicked: {}", e))??;

    if applied_count > 0 {
        info!("[MIGRATIONS] ✓ Applied {} migrations", applied_count);
    } else {
        info!("[MIGRATIONS] ✓ Schema up to date");
    }

    Ok(applied_count)
}
