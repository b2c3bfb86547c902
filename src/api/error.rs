// SupportError -> HTTP response

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::warn;

use crate::error::{FieldError, SupportError};

/// Error body for 400/409/500 responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}

impl IntoResponse for SupportError {
    fn into_response(self) -> Response {
        match self {
            SupportError::InvalidInput(message) => {
                warn!(%message, "rejected invalid input");
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
            }
            SupportError::Validation(details) => {
                warn!(fields = details.len(), "rejected invalid body");
                let body = ErrorResponse {
                    error: "validation failed".to_string(),
                    details,
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            // Not-found answers carry no body
            SupportError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            SupportError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(ErrorResponse::new(message))).into_response()
            }
            // Cause was logged where the failure was classified
            SupportError::Internal { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(message)),
            )
                .into_response(),
        }
    }
}
