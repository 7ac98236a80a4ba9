use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::reports::UnknownGroup;

#[rustfmt::skip]
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report not found")]
    NotFound(String),

    #[error("No row generator registered for report '{0}'")]
    MissingGenerator(String),

    #[error("Failed to serialize report rows")]
    SerializationFailed { #[from] source: serde_json::Error },

    #[error("Invalid report query: {0}")]
    InvalidQuery(String),
}

impl From<UnknownGroup> for ReportError {
    fn from(error: UnknownGroup) -> Self {
        Self::InvalidQuery(error.to_string())
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound(id) => {
                tracing::warn!(report_id = %id, "Report not found");
                // plain text body, matching what download links expect
                (StatusCode::NOT_FOUND, "Report not found").into_response()
            }
            Self::InvalidQuery(_) => {
                tracing::warn!(error_message = %self, "Rejected report query");
                let body = Json(json!({ "result": "error", "message": self.to_string() }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            Self::MissingGenerator(_) | Self::SerializationFailed { .. } => {
                tracing::error!(
                    error_type = %std::any::type_name::<Self>(),
                    error_message = %self);
                let body = Json(json!({ "result": "error", "message": self.to_string() }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
