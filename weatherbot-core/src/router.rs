//! Command and callback routing against a narrow chat-transport contract.
//! Every inbound event maps to one outbound reply; nothing is remembered
//! between interactions, coordinates ride along inside button payloads.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::geocode::GeocodeClient;
use crate::model::{GeoLocation, ReportKind};
use crate::payload::CallbackPayload;
use crate::report;
use crate::weather::WeatherClient;

/// User-facing texts. Fixed display language, no negotiation.
pub const START_MESSAGE: &str = "Hi 👋\n\
    I am a bot that shows the weather.\n\n\
    Send a command like:\n\
    /weather Lviv\n\n\
    👉 and I will tell you the temperature, how it feels and the sky 🌦";
pub const WEATHER_USAGE: &str = "⚠️ Name a city: /weather Kyiv";
pub const HOURLY_USAGE: &str = "⚠️ Name a city: /hourly Kyiv";
pub const CITY_NOT_FOUND: &str = "❌ I could not find that city. Try again.";
pub const FETCH_FAILED: &str = "❌ Could not fetch weather data.";

/// Hours offered by the hourly button and the `/hourly` command.
const DEFAULT_HOURS: u32 = 1;
/// Days offered by the daily button.
const DEFAULT_DAYS: u32 = 5;

/// One inline button: a label shown to the user and the payload the chat
/// platform round-trips back on a press.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

/// The narrow contract the router needs from a chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `text` to the chat, with a row-per-button keyboard when `buttons`
    /// is non-empty.
    async fn send_message(&self, chat_id: i64, text: &str, buttons: &[Button])
    -> anyhow::Result<()>;

    /// Confirm a button press so the client dismisses its loading indicator.
    async fn acknowledge(&self, callback_id: &str) -> anyhow::Result<()>;
}

/// Maps inbound chat events to geocoding/weather calls and replies. Stateless;
/// constructed once at startup and handed to the transport's event loop.
pub struct Router {
    geocode: GeocodeClient,
    weather: WeatherClient,
}

impl Router {
    pub fn new(geocode: GeocodeClient, weather: WeatherClient) -> Self {
        Self { geocode, weather }
    }

    /// `/start`: greeting and usage.
    pub async fn handle_start(
        &self,
        transport: &dyn ChatTransport,
        chat_id: i64,
    ) -> anyhow::Result<()> {
        transport.send_message(chat_id, START_MESSAGE, &[]).await
    }

    /// `/weather <city>`: resolve the city, then offer the three report kinds
    /// as buttons carrying the resolved coordinates.
    pub async fn handle_weather(
        &self,
        transport: &dyn ChatTransport,
        chat_id: i64,
        args: &str,
    ) -> anyhow::Result<()> {
        let Some(city) = parse_city(args) else {
            return transport.send_message(chat_id, WEATHER_USAGE, &[]).await;
        };

        let Some(location) = self.resolve(transport, chat_id, city).await? else {
            return Ok(());
        };

        let buttons = match selection_buttons(&location) {
            Ok(buttons) => buttons,
            Err(err) => {
                warn!(%err, city = %location.city, "could not encode selection buttons");
                return transport.send_message(chat_id, CITY_NOT_FOUND, &[]).await;
            }
        };

        let text = format!("Found {}! Pick a report:", location.city);
        transport.send_message(chat_id, &text, &buttons).await
    }

    /// `/hourly <city>`: geocoding and report in one step, no selection.
    pub async fn handle_hourly(
        &self,
        transport: &dyn ChatTransport,
        chat_id: i64,
        args: &str,
    ) -> anyhow::Result<()> {
        let Some(city) = parse_city(args) else {
            return transport.send_message(chat_id, HOURLY_USAGE, &[]).await;
        };

        let Some(location) = self.resolve(transport, chat_id, city).await? else {
            return Ok(());
        };

        let text = self
            .build_report(&CallbackPayload {
                kind: ReportKind::Hourly,
                city: location.city,
                latitude: location.latitude,
                longitude: location.longitude,
                count: DEFAULT_HOURS,
            })
            .await;
        transport.send_message(chat_id, &text, &[]).await
    }

    /// Button press: decode the payload, fetch with the embedded coordinates
    /// (geocoding already ran), reply, and acknowledge the press exactly once
    /// whatever the fetch outcome.
    pub async fn handle_callback(
        &self,
        transport: &dyn ChatTransport,
        chat_id: i64,
        callback_id: &str,
        data: &str,
    ) -> anyhow::Result<()> {
        let sent = match CallbackPayload::decode(data) {
            Ok(payload) => {
                info!(kind = %payload.kind, city = %payload.city, "handling button press");
                let text = self.build_report(&payload).await;
                transport.send_message(chat_id, &text, &[]).await
            }
            Err(err) => {
                warn!(%err, data, "ignoring undecodable callback payload");
                Ok(())
            }
        };

        // The press is confirmed even when the reply could not be sent.
        let acked = transport.acknowledge(callback_id).await;
        sent.and(acked)
    }

    /// Fetch and render one report. All three paths surface fetch failures as
    /// the same display string.
    async fn build_report(&self, payload: &CallbackPayload) -> String {
        let result = match payload.kind {
            ReportKind::Current => self
                .weather
                .fetch_current(payload.latitude, payload.longitude)
                .await
                .map(|snapshot| report::current_report(&payload.city, &snapshot)),
            ReportKind::Hourly => self
                .weather
                .fetch_hourly(payload.latitude, payload.longitude, payload.count as usize)
                .await
                .map(|entries| report::hourly_report(&payload.city, &entries)),
            ReportKind::Daily => self
                .weather
                .fetch_daily(payload.latitude, payload.longitude, payload.count as usize)
                .await
                .map(|aggregates| {
                    report::daily_report(&payload.city, payload.count as usize, &aggregates)
                }),
        };

        result.unwrap_or_else(|err| {
            warn!(%err, city = %payload.city, kind = %payload.kind, "weather fetch failed");
            FETCH_FAILED.to_string()
        })
    }

    /// Geocode `city`. A miss replies "not found" and yields `None`; a
    /// transport-level geocoding failure replies the uniform failure message.
    async fn resolve(
        &self,
        transport: &dyn ChatTransport,
        chat_id: i64,
        city: &str,
    ) -> anyhow::Result<Option<GeoLocation>> {
        match self.geocode.resolve(city).await {
            Ok(Some(location)) => Ok(Some(location)),
            Ok(None) => {
                transport.send_message(chat_id, CITY_NOT_FOUND, &[]).await?;
                Ok(None)
            }
            Err(err) => {
                warn!(%err, city, "geocoding failed");
                transport.send_message(chat_id, FETCH_FAILED, &[]).await?;
                Ok(None)
            }
        }
    }
}

fn parse_city(args: &str) -> Option<&str> {
    let city = args.trim();
    (!city.is_empty()).then_some(city)
}

/// The three report-kind choices offered after a successful lookup, each
/// payload embedding the resolved coordinates so the press skips geocoding.
fn selection_buttons(location: &GeoLocation) -> Result<Vec<Button>, crate::payload::PayloadError> {
    let choices = [
        ("🌡 Current", ReportKind::Current, 0),
        ("🕑 Next hour", ReportKind::Hourly, DEFAULT_HOURS),
        ("📅 5-day forecast", ReportKind::Daily, DEFAULT_DAYS),
    ];

    choices
        .into_iter()
        .map(|(label, kind, count)| {
            let payload = CallbackPayload {
                kind,
                city: location.city.clone(),
                latitude: location.latitude,
                longitude: location.longitude,
                count,
            };
            Ok(Button {
                label: label.to_string(),
                payload: payload.encode()?,
            })
        })
        .collect()
}
