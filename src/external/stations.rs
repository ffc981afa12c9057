//! Charging-station directory client.
//!
//! The configured `api_key` segment already opens the query string
//! (e.g. `?key=abc123`), so every endpoint appends its own parameters with `&`.

use std::time::Duration;

use crate::config::StationSettings;
use crate::error::{AppError, AppResult};

use super::client::build_http_client;

const SERVICE: &str = "stations";

/// Search radius in kilometres when the caller gives none
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Clone)]
pub struct StationDirectory {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl StationDirectory {
    pub fn new(client: reqwest::Client, settings: &StationSettings) -> Self {
        Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    /// Build the directory with its own client from settings.
    pub fn from_settings(settings: &StationSettings) -> AppResult<Self> {
        let client = build_http_client(
            Duration::from_secs(settings.timeout),
            settings.max_redirects,
        )
        .map_err(|e| AppError::Configuration {
            key: "stations".to_string(),
            source: e.into(),
        })?;

        Ok(Self::new(client, settings))
    }

    pub fn search_url(&self, lat: f64, lng: f64, radius: f64) -> String {
        format!(
            "{}/chargepoints/{}&lat={}&lng={}&radius={}&orderby=distance",
            self.api_url, self.api_key, lat, lng, radius
        )
    }

    pub fn detail_url(&self, id: &str) -> String {
        format!("{}/chargepoints/{}&ge_id={}", self.api_url, self.api_key, id)
    }

    pub fn photo_url(&self, id: &str) -> String {
        format!("{}/chargepoints/photo/{}&id={}", self.api_url, self.api_key, id)
    }

    pub fn cards_url(&self) -> String {
        format!("{}/chargepoints/chargecardlist/{}", self.api_url, self.api_key)
    }

    /// Stations around a position, ordered by distance
    pub async fn search(&self, lat: f64, lng: f64, radius: f64) -> AppResult<serde_json::Value> {
        self.fetch_json(&self.search_url(lat, lng, radius)).await
    }

    pub async fn station(&self, id: &str) -> AppResult<serde_json::Value> {
        self.fetch_json(&self.detail_url(id)).await
    }

    pub async fn cards(&self) -> AppResult<serde_json::Value> {
        self.fetch_json(&self.cards_url()).await
    }

    /// Start the photo download; the caller streams the body.
    pub async fn photo(&self, id: &str) -> AppResult<reqwest::Response> {
        self.get(&self.photo_url(id)).await
    }

    async fn fetch_json(&self, url: &str) -> AppResult<serde_json::Value> {
        self.get(url)
            .await?
            .json()
            .await
            .map_err(|e| AppError::upstream(SERVICE, e.without_url()))
    }

    /// URLs carry the api key, so it is stripped from every error.
    async fn get(&self, url: &str) -> AppResult<reqwest::Response> {
        self.client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| AppError::upstream(SERVICE, e.without_url()))
    }
}
