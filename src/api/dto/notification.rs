//! Notification request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::notifications::NotificationRequest;

pub const NOTIFICATIONS_SENT: &str = "Notifications successfully sent";

/// Body of `POST /api/notification`.
///
/// Credentials are optional here so that missing and empty values produce the
/// same 422 from the dispatcher.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"akey": "A1", "token": "T1", "error": "disk-full"}))]
pub struct SendNotificationRequest {
    /// Account key
    pub akey: Option<String>,
    /// Account token, compared by exact equality
    pub token: Option<String>,
    /// Opaque payload forwarded to every channel
    #[serde(default)]
    #[schema(value_type = Object)]
    pub error: serde_json::Value,
}

impl From<SendNotificationRequest> for NotificationRequest {
    fn from(req: SendNotificationRequest) -> Self {
        NotificationRequest {
            account_key: req.akey,
            token: req.token,
            payload: req.error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"message": "Notifications successfully sent"}))]
pub struct NotificationSentResponse {
    pub message: String,
}

impl Default for NotificationSentResponse {
    fn default() -> Self {
        Self {
            message: NOTIFICATIONS_SENT.to_string(),
        }
    }
}
