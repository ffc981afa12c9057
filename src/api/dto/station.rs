//! Station proxy DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Envelope `err` value for any upstream failure
pub const UPSTREAM_FAILURE: u16 = 500;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"lat": 52.52, "lng": 13.405, "radius": 10}))]
pub struct StationSearchRequest {
    pub lat: f64,
    pub lng: f64,
    /// Search radius in kilometres, defaults to 10
    #[validate(range(exclusive_min = 0.0))]
    pub radius: Option<f64>,
}

/// Station id as sent by clients, either a JSON number or a string.
///
/// Text ids end up in the upstream query string and are limited to
/// ASCII letters, digits, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StationId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StationId::Number(id) => write!(f, "{}", id),
            StationId::Text(id) => f.write_str(id),
        }
    }
}

fn validate_station_id(id: &StationId) -> Result<(), ValidationError> {
    match id {
        StationId::Text(text) if text.trim().is_empty() => Err(ValidationError::new("empty")),
        StationId::Text(text)
            if !text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') =>
        {
            Err(ValidationError::new("charset"))
        }
        StationId::Number(0) => Err(ValidationError::new("zero")),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"id": 4711}))]
pub struct StationIdRequest {
    #[validate(custom(function = "validate_station_id"))]
    pub id: StationId,
}

/// `{err, stations}`; upstream JSON is passed through unchanged
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationsResponse {
    #[schema(nullable)]
    pub err: Option<u16>,
    #[schema(value_type = Object, nullable)]
    pub stations: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationResponse {
    #[schema(nullable)]
    pub err: Option<u16>,
    #[schema(value_type = Object, nullable)]
    pub station: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CardsResponse {
    #[schema(nullable)]
    pub err: Option<u16>,
    #[schema(value_type = Object, nullable)]
    pub cards: Option<serde_json::Value>,
}

/// Split an upstream result into the `(err, data)` envelope pair.
pub fn envelope<E>(result: Result<serde_json::Value, E>) -> (Option<u16>, Option<serde_json::Value>) {
    match result {
        Ok(data) => (None, Some(data)),
        Err(_) => (Some(UPSTREAM_FAILURE), None),
    }
}
