use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError as SqlxMigrateError;
use thiserror::Error;

use crate::core::DbContext;

#[rustfmt::skip]
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to run embedded migrations")]
    EmbeddedMigrationFailed { source: SqlxMigrateError },

    #[error("No migrations applied yet")]
    NoMigrationsApplied,

    #[error("Failed to fetch applied migrations")]
    FetchAppliedMigrationsFailed { #[from] source: SqlxError },
}

/// List all embedded migrations as `version description`
#[must_use]
pub fn list_migrations() -> Vec<String> {
    sqlx::migrate!("./migrations")
        .iter()
        .map(|m| format!("{} {}", m.version, m.description))
        .collect::<Vec<_>>()
}

/// Runs the embedded migrations
pub async fn run_migrations(db: &DbContext) -> Result<(), MigrationError> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .map_err(|e| MigrationError::EmbeddedMigrationFailed { source: e })?;
    tracing::info!("Database migrations completed successfully.");
    Ok(())
}

/// Check if migrations need to be applied
pub async fn check_pending_migrations(db: &DbContext) -> Result<bool, MigrationError> {
    let available = sqlx::migrate!("./migrations").iter().count();
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(db)
        .await
        .map_err(|err| match &err {
            SqlxError::Database(e) if e.message().contains("no such table") => MigrationError::NoMigrationsApplied,
            _ => MigrationError::FetchAppliedMigrationsFailed { source: err },
        })?;
    Ok(usize::try_from(applied).map_or(true, |applied| available > applied))
}
