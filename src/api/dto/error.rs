//! Error response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body shared by every endpoint.
///
/// `error` repeats the HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"message": "Unauthorized", "error": 401}))]
pub struct ErrorResponse {
    pub message: String,
    pub error: u16,
}

impl ErrorResponse {
    pub fn new(status: u16, message: &str) -> Self {
        Self {
            message: message.to_string(),
            error: status,
        }
    }
}
