use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::cfg::DatabaseSettings;

pub type DbContext = sqlx::SqlitePool;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionFailed(sqlx::Error),

    #[error("Database operation failed: {0}")]
    OperationFailed(sqlx::Error),

    #[error("Row not found: {0}")]
    RowNotFound(sqlx::Error),

    #[error("Constraint violated: {0}")]
    ConstraintViolated(sqlx::Error),
}

impl DbError {
    #[must_use]
    pub fn not_found() -> Self {
        Self::RowNotFound(sqlx::Error::RowNotFound)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::RowNotFound(error),
            sqlx::Error::Database(e) if e.is_unique_violation() || e.is_foreign_key_violation() => {
                Self::ConstraintViolated(sqlx::Error::Database(e))
            }
            _ => Self::OperationFailed(error),
        }
    }
}

pub async fn create_db_context(db_config: &DatabaseSettings) -> Result<DbContext, DbError> {
    let options = SqliteConnectOptions::from_str(&db_config.url)
        .map_err(DbError::ConnectionFailed)?
        .create_if_missing(true)
        .foreign_keys(true)
        // Increase SQLite busy timeout to handle concurrent connections better
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(db_config.max_connections)
        .connect_with(options)
        .await
        .map_err(DbError::ConnectionFailed)?;

    tracing::info!(url = %db_config.url, "Database pool initialized");
    Ok(pool)
}
