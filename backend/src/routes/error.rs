use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::core::DbError;

/// Errors returned by the tenant-scoped admin endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Missing or invalid x-tenant-id header")]
    TenantRequired,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(DbError),
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::ConstraintViolated(e) => {
                tracing::debug!(error = %e, "Constraint violated");
                Self::Conflict("Request conflicts with existing data".to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl ApiError {
    /// Maps a missing row to `NotFound(entity)`; other database errors pass through.
    pub fn lookup(entity: &'static str) -> impl FnOnce(DbError) -> Self {
        move |error| match error {
            DbError::RowNotFound(_) => Self::NotFound(entity),
            other => other.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadRequest(_) | Self::TenantRequired => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(
                error_type = %std::any::type_name::<Self>(),
                error_message = %self);
        } else {
            tracing::warn!(status = status.as_u16(), error_message = %self, "Request rejected");
        }

        let body = Json(json!({
            "result": "error",
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}
