//! Embedded schema migrations.

use tracing::info;

use mediavault_core::error::{AppError, ErrorKind};
use mediavault_core::result::AppResult;

use crate::connection::DatabasePool;

/// Apply every pending migration from the workspace `migrations/` directory.
pub async fn run_migrations(db: &DatabasePool) -> AppResult<()> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(db.pool())
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations applied");
    Ok(())
}
