//! Geocoding client: resolves a free-text city name to coordinates through
//! the OpenWeather direct-geocoding endpoint.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::model::GeoLocation;

const GEOCODING_BASE_URL: &str = "http://api.openweathermap.org/geo/1.0";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse geocoding response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the OpenWeather direct-geocoding endpoint.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: GEOCODING_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve a city name to its best-match coordinates, limit 1.
    ///
    /// A non-success provider status and an empty result list both mean the
    /// city is unknown and map to `Ok(None)`; only transport and parse
    /// failures surface as errors.
    pub async fn resolve(&self, city: &str) -> Result<Option<GeoLocation>, GeocodeError> {
        let url = format!("{}/direct", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("limit", "1")])
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::warn!(status = %res.status(), city, "geocoding returned non-success status");
            return Ok(None);
        }

        let body = res.text().await?;
        let matches: Vec<GeoMatch> = serde_json::from_str(&body)?;

        Ok(matches.into_iter().next().map(|m| GeoLocation {
            city: city.to_string(),
            latitude: m.lat,
            longitude: m.lon,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    lat: f64,
    lon: f64,
}
