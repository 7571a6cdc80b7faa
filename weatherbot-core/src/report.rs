//! Fixed-template report rendering. Pure and stateless; the only transform
//! beyond interpolation is capitalizing the provider's lowercase descriptions.

use crate::model::{DailyAggregate, ForecastEntry, WeatherSnapshot, capitalize};

pub fn current_report(city: &str, snapshot: &WeatherSnapshot) -> String {
    format!(
        "🌍 Weather in {city}:\n\
         🌡 Temperature: {}°C\n\
         🤔 Feels like: {}°C\n\
         ☁ {}",
        snapshot.temperature_c,
        snapshot.feels_like_c,
        capitalize(&snapshot.description),
    )
}

pub fn hourly_report(city: &str, entries: &[ForecastEntry]) -> String {
    let mut report = format!("🌤 Hourly weather in {city}:\n");
    for entry in entries {
        report.push_str(&format!(
            "\n🕑 {} → {}°C, {}",
            entry.timestamp.format("%H:%M"),
            entry.temperature_c,
            capitalize(&entry.description),
        ));
    }
    report
}

pub fn daily_report(city: &str, days: usize, aggregates: &[DailyAggregate]) -> String {
    let mut report = format!("📅 {days}-day forecast for {city}:\n");
    for aggregate in aggregates {
        report.push_str(&format!(
            "\n👉 {}: {:.1}°C, {}",
            aggregate.date, aggregate.avg_temp_c, aggregate.description,
        ));
    }
    report
}
