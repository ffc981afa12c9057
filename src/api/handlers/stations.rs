//! Station proxy handlers.
//!
//! JSON endpoints always answer 200 with an `{err, <data>}` envelope; the
//! photo endpoint streams the upstream body.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::STATION_TAG;
use crate::api::dto::{
    CardsResponse, ErrorResponse, StationIdRequest, StationResponse, StationSearchRequest,
    StationsResponse, envelope,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

const DEFAULT_PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// Routes:
/// - POST /stations          - Search stations around a position
/// - POST /station           - Station detail
/// - POST /station/photo     - Station photo bytes
/// - GET|POST /station/cards - Charging card list
pub fn station_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(search_stations))
        .routes(routes!(get_station))
        .routes(routes!(get_station_photo))
        .routes(routes!(get_station_cards))
}

#[utoipa::path(
    post,
    path = "/stations",
    tag = STATION_TAG,
    request_body = StationSearchRequest,
    responses(
        (status = 200, description = "Upstream result, `err` is 500 on upstream failure", body = StationsResponse),
        (status = 422, description = "Missing parameters", body = ErrorResponse)
    )
)]
pub async fn search_stations(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<StationSearchRequest>,
) -> Json<StationsResponse> {
    let (err, stations) = envelope(
        state
            .services
            .stations
            .search(req.lat, req.lng, req.radius)
            .await,
    );
    Json(StationsResponse { err, stations })
}

#[utoipa::path(
    post,
    path = "/station",
    tag = STATION_TAG,
    request_body = StationIdRequest,
    responses(
        (status = 200, description = "Upstream result, `err` is 500 on upstream failure", body = StationResponse),
        (status = 422, description = "Missing parameters", body = ErrorResponse)
    )
)]
pub async fn get_station(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<StationIdRequest>,
) -> Json<StationResponse> {
    let (err, station) = envelope(state.services.stations.station(&req.id.to_string()).await);
    Json(StationResponse { err, station })
}

#[utoipa::path(
    post,
    path = "/station/photo",
    tag = STATION_TAG,
    request_body = StationIdRequest,
    responses(
        (status = 200, description = "Photo bytes", content_type = "image/jpeg"),
        (status = 422, description = "Missing parameters", body = ErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn get_station_photo(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<StationIdRequest>,
) -> AppResult<Response> {
    let upstream = state
        .services
        .stations
        .photo(&req.id.to_string())
        .await?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_PHOTO_CONTENT_TYPE));

    Ok((
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

#[utoipa::path(
    method(get, post),
    path = "/station/cards",
    tag = STATION_TAG,
    responses(
        (status = 200, description = "Upstream result, `err` is 500 on upstream failure", body = CardsResponse)
    )
)]
pub async fn get_station_cards(State(state): State<AppState>) -> Json<CardsResponse> {
    let (err, cards) = envelope(state.services.stations.cards().await);
    Json(CardsResponse { err, cards })
}
