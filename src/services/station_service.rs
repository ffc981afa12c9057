//! Station proxy service.

use crate::error::AppResult;
use crate::external::StationDirectory;
use crate::external::stations::DEFAULT_RADIUS_KM;

/// Single-attempt pass-through to the station directory. Failures are logged
/// here and returned unchanged; the HTTP layer decides how to render them.
#[derive(Clone)]
pub struct StationService {
    directory: StationDirectory,
}

impl StationService {
    pub fn new(directory: StationDirectory) -> Self {
        Self { directory }
    }

    pub async fn search(
        &self,
        lat: f64,
        lng: f64,
        radius: Option<f64>,
    ) -> AppResult<serde_json::Value> {
        let radius = radius.unwrap_or(DEFAULT_RADIUS_KM);
        self.directory
            .search(lat, lng, radius)
            .await
            .inspect_err(|e| tracing::warn!(error = ?e, lat, lng, radius, "Station search failed"))
    }

    pub async fn station(&self, id: &str) -> AppResult<serde_json::Value> {
        self.directory
            .station(id)
            .await
            .inspect_err(|e| tracing::warn!(error = ?e, station_id = %id, "Station lookup failed"))
    }

    pub async fn cards(&self) -> AppResult<serde_json::Value> {
        self.directory
            .cards()
            .await
            .inspect_err(|e| tracing::warn!(error = ?e, "Charging card list failed"))
    }

    pub async fn photo(&self, id: &str) -> AppResult<reqwest::Response> {
        self.directory
            .photo(id)
            .await
            .inspect_err(|e| tracing::warn!(error = ?e, station_id = %id, "Station photo failed"))
    }
}
