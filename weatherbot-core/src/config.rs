use anyhow::{Context, Result};

/// Process credentials, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token.
    pub bot_token: String,
    /// OpenWeather API key, shared by the geocoding and forecast endpoints.
    pub weather_api_key: String,
}

impl Config {
    /// Load credentials from the environment. Both variables are required;
    /// a missing one is fatal at startup.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bot_token: require_var("BOT_TOKEN")?,
            weather_api_key: require_var("WEATHER_API_KEY")?,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    std::env::var(name)
        .with_context(|| format!("Missing required environment variable {name}"))
}
