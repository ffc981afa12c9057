//! Error handler for converting AppError to HTTP responses.
//!
//! Every error renders as `{message, error}`. Client errors carry their own
//! message; server-side errors are logged here and rendered with a sanitized
//! message.

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

const INTERNAL_SERVER_ERROR: &str = "Internal server error";

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - NotFound → 404
    /// - Validation → 400
    /// - UnprocessableContent → 422
    /// - Unauthorized → 401, always rendered as "Unauthorized"
    /// - ConnectionPool → 503
    /// - Database, Upstream, Configuration, Internal → 500
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::UnprocessableContent { message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
            }
            AppError::Unauthorized { message } => {
                tracing::info!(reason = %message, "Request rejected as unauthorized");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            AppError::ConnectionPool { .. } => {
                tracing::error!(error = ?self, "Account store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service unavailable".to_string(),
                )
            }
            AppError::Database { .. }
            | AppError::Upstream { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. } => {
                tracing::error!(error = ?self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER_ERROR.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(status.as_u16(), &message))).into_response()
    }
}

/// Router fallback for unknown paths
pub async fn not_found_handler(request: Request) -> AppError {
    AppError::NotFound {
        entity: "route".to_string(),
        field: "path".to_string(),
        value: request.uri().path().to_string(),
    }
}
