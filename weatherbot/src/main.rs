//! Telegram front-end for the weather bot.
//!
//! Builds the HTTP clients and the router once, constructs the dispatch tree,
//! and long-polls Telegram for updates.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::info;
use weatherbot_core::{Config, GeocodeClient, Router, WeatherClient};

mod telegram;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    info!("Loaded configuration");

    // One HTTP client shared by both API clients.
    let http = reqwest::Client::new();
    let router = Arc::new(Router::new(
        GeocodeClient::new(http.clone(), config.weather_api_key.clone()),
        WeatherClient::new(http, config.weather_api_key),
    ));

    let bot = Bot::new(config.bot_token);
    info!("Starting long polling");

    Dispatcher::builder(bot, telegram::handler_tree())
        .dependencies(dptree::deps![router])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
