//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use bazar_core::error::{AppError, ErrorKind};

/// Run all pending database migrations.
///
/// The migration set also seeds the default marketplace tenant, so a
/// freshly migrated database can accept customer registrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}
