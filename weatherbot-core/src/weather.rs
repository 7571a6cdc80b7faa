//! Weather client for the OpenWeather current-conditions and forecast-list
//! endpoints. All three operations request metric units and a fixed display
//! language, and apply the same status and parse handling.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{DailyAggregate, ForecastEntry, WeatherSnapshot};

const WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Display language requested from the provider.
const LANG: &str = "en";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the OpenWeather instant and forecast-list endpoints.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: WEATHER_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Current conditions at the given coordinates.
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let body = self.get("weather", lat, lon).await?;
        let parsed: OwCurrent = serde_json::from_str(&body)?;

        Ok(WeatherSnapshot {
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            description: first_description(parsed.weather),
        })
    }

    /// First `hours` entries of the forecast series (3-hour provider steps).
    pub async fn fetch_hourly(
        &self,
        lat: f64,
        lon: f64,
        hours: usize,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let mut entries = self.fetch_forecast(lat, lon).await?;
        entries.truncate(hours);
        Ok(entries)
    }

    /// Per-date summaries for the first `days` distinct calendar dates of the
    /// forecast series.
    pub async fn fetch_daily(
        &self,
        lat: f64,
        lon: f64,
        days: usize,
    ) -> Result<Vec<DailyAggregate>, WeatherError> {
        let entries = self.fetch_forecast(lat, lon).await?;
        Ok(DailyAggregate::from_entries(&entries, days))
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body = self.get("forecast", lat, lon).await?;
        let parsed: OwForecast = serde_json::from_str(&body)?;

        Ok(parsed
            .list
            .into_iter()
            .map(|e| ForecastEntry {
                timestamp: unix_to_utc(e.dt),
                temperature_c: e.main.temp,
                description: first_description(e.weather),
            })
            .collect())
    }

    async fn get(&self, endpoint: &str, lat: f64, lon: f64) -> Result<String, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", LANG.to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecast {
    list: Vec<OwForecastEntry>,
}

fn first_description(weather: Vec<OwWeather>) -> String {
    weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .unwrap_or_else(|| "unknown".to_string())
}

fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Cut point must land on a char boundary or the slice panics.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WeatherClient {
        WeatherClient::new(Client::new(), "test-key").with_base_url(server.uri())
    }

    fn forecast_body() -> serde_json::Value {
        // Two entries on 2026-08-25, one on 2026-08-26, 3-hour steps.
        serde_json::json!({
            "list": [
                {
                    "dt": 1787648400i64, // 2026-08-25 09:00:00 UTC
                    "main": { "temp": 18.0, "feels_like": 17.0 },
                    "weather": [{ "description": "light rain" }]
                },
                {
                    "dt": 1787659200i64, // 2026-08-25 12:00:00 UTC
                    "main": { "temp": 22.0, "feels_like": 21.0 },
                    "weather": [{ "description": "light rain" }]
                },
                {
                    "dt": 1787734800i64, // 2026-08-26 09:00:00 UTC
                    "main": { "temp": 15.0, "feels_like": 14.0 },
                    "weather": [{ "description": "clear sky" }]
                }
            ]
        })
    }

    #[tokio::test]
    async fn fetch_current_parses_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 21.5, "feels_like": 20.0 },
                "weather": [{ "description": "clear sky" }]
            })))
            .mount(&server)
            .await;

        let snapshot = client(&server).fetch_current(50.45, 30.52).await.unwrap();

        assert_eq!(snapshot.temperature_c, 21.5);
        assert_eq!(snapshot.feels_like_c, 20.0);
        assert_eq!(snapshot.description, "clear sky");
    }

    #[tokio::test]
    async fn fetch_current_surfaces_non_success_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).fetch_current(50.45, 30.52).await.unwrap_err();

        assert!(matches!(err, WeatherError::Status { .. }));
    }

    #[tokio::test]
    async fn forecast_paths_surface_non_success_status_too() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let c = client(&server);

        let hourly_err = c.fetch_hourly(50.45, 30.52, 1).await.unwrap_err();
        let daily_err = c.fetch_daily(50.45, 30.52, 5).await.unwrap_err();

        assert!(matches!(hourly_err, WeatherError::Status { .. }));
        assert!(matches!(daily_err, WeatherError::Status { .. }));
    }

    #[test]
    fn truncate_body_cuts_at_char_boundary() {
        let short = "too many requests";
        assert_eq!(truncate_body(short), short);

        // A two-byte char straddles the cut point; the cut walks back to the
        // previous boundary instead of panicking.
        let body = format!("{}é and more", "a".repeat(199));
        assert_eq!(truncate_body(&body), format!("{}...", "a".repeat(199)));
    }

    #[tokio::test]
    async fn status_error_tolerates_multibyte_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string(format!("{}é", "a".repeat(199))),
            )
            .mount(&server)
            .await;

        let err = client(&server).fetch_current(50.45, 30.52).await.unwrap_err();

        assert!(matches!(err, WeatherError::Status { .. }));
    }

    #[tokio::test]
    async fn fetch_hourly_takes_first_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let entries = client(&server).fetch_hourly(50.45, 30.52, 2).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].temperature_c, 18.0);
        assert_eq!(entries[1].temperature_c, 22.0);
    }

    #[tokio::test]
    async fn fetch_daily_groups_by_calendar_date() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let aggregates = client(&server).fetch_daily(50.45, 30.52, 5).await.unwrap();

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].avg_temp_c, 20.0);
        assert_eq!(aggregates[0].description, "Light rain");
        assert_eq!(aggregates[1].avg_temp_c, 15.0);
        assert_eq!(aggregates[1].description, "Clear sky");
    }
}
