//! Core library for the Telegram weather bot.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the geocoding and weather endpoints
//! - Report formatting and the callback payload codec
//! - The transport-agnostic command/callback router
//!
//! It is used by the `weatherbot` binary, but can also be reused by other
//! front-ends that speak the same narrow chat contract.

pub mod config;
pub mod geocode;
pub mod model;
pub mod payload;
pub mod report;
pub mod router;
pub mod weather;

pub use config::Config;
pub use geocode::{GeocodeClient, GeocodeError};
pub use model::{DailyAggregate, ForecastEntry, GeoLocation, ReportKind, WeatherSnapshot};
pub use payload::{CallbackPayload, PayloadError};
pub use router::{Button, ChatTransport, Router};
pub use weather::{WeatherClient, WeatherError};
