use utoipa::OpenApi;

pub const HEALTH_TAG: &str = "Health";
pub const NOTIFICATION_TAG: &str = "Notifications";
pub const STATION_TAG: &str = "Stations";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EVNotify",
        description = "Notification dispatch and charging-station proxy for EVNotify",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = NOTIFICATION_TAG, description = "Notification dispatch endpoints"),
        (name = STATION_TAG, description = "Charging-station directory proxy"),
    )
)]
pub struct ApiDoc;
