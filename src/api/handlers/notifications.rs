//! Notification API handler.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::NOTIFICATION_TAG;
use crate::api::dto::{ErrorResponse, NotificationSentResponse, SendNotificationRequest};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Routes:
/// - POST /notification - Authorize and fan out a notification
pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(send_notification))
}

/// POST /api/notification - Send a notification to every enabled channel
///
/// Answers as soon as the sends are launched; delivery outcome is never
/// reported back.
#[utoipa::path(
    post,
    path = "/notification",
    tag = NOTIFICATION_TAG,
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Notifications dispatched", body = NotificationSentResponse),
        (status = 401, description = "Unknown account, wrong token or store failure", body = ErrorResponse),
        (status = 422, description = "Missing parameters", body = ErrorResponse)
    )
)]
pub async fn send_notification(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SendNotificationRequest>,
) -> AppResult<Json<NotificationSentResponse>> {
    state.services.notifications.handle(req.into()).await?;
    Ok(Json(NotificationSentResponse::default()))
}
