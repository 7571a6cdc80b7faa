use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

/// A city resolved to coordinates. Never stored; it is threaded through one
/// request/response cycle or serialized into a button payload.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Conditions at a single instant, in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
}

/// One timestamped observation in a multi-point forecast series. The provider
/// returns them at fixed 3-hour steps.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub description: String,
}

/// Derived summary for one calendar date of forecast entries. Computed on
/// demand, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Arithmetic mean of the date's entry temperatures, one decimal place.
    pub avg_temp_c: f64,
    /// Most frequent description for the date, capitalized. Ties go to the
    /// first-encountered description.
    pub description: String,
}

impl DailyAggregate {
    /// Group forecast entries by calendar date, keeping first-encounter order,
    /// and summarize at most `days` distinct dates.
    pub fn from_entries(entries: &[ForecastEntry], days: usize) -> Vec<DailyAggregate> {
        let mut order: Vec<NaiveDate> = Vec::new();
        let mut by_date: HashMap<NaiveDate, Vec<&ForecastEntry>> = HashMap::new();

        for entry in entries {
            let date = entry.timestamp.date_naive();
            by_date
                .entry(date)
                .or_insert_with(|| {
                    order.push(date);
                    Vec::new()
                })
                .push(entry);
        }

        order
            .into_iter()
            .take(days)
            .map(|date| {
                let day = &by_date[&date];
                let mean = day.iter().map(|e| e.temperature_c).sum::<f64>() / day.len() as f64;
                DailyAggregate {
                    date,
                    avg_temp_c: (mean * 10.0).round() / 10.0,
                    description: capitalize(dominant_description(day)),
                }
            })
            .collect()
    }
}

/// Strictly most frequent description wins; on a tie, whichever description
/// appeared first in the series.
fn dominant_description<'a>(entries: &[&'a ForecastEntry]) -> &'a str {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.description.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for entry in entries {
        let count = counts[entry.description.as_str()];
        match best {
            Some((_, n)) if n >= count => {}
            _ => best = Some((entry.description.as_str(), count)),
        }
    }

    best.map(|(description, _)| description).unwrap_or("")
}

/// Uppercase the first character; the provider sends descriptions lowercased.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Which report a button press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Current,
    Hourly,
    Daily,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Current => "current",
            ReportKind::Hourly => "hourly",
            ReportKind::Daily => "daily",
        }
    }

    pub const fn all() -> &'static [ReportKind] {
        &[ReportKind::Current, ReportKind::Hourly, ReportKind::Daily]
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReportKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "current" => Ok(ReportKind::Current),
            "hourly" => Ok(ReportKind::Hourly),
            "daily" => Ok(ReportKind::Daily),
            _ => Err(anyhow::anyhow!(
                "Unknown report kind '{value}'. Supported kinds: current, hourly, daily."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(day: u32, hour: u32, temp: f64, description: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap(),
            temperature_c: temp,
            description: description.to_string(),
        }
    }

    #[test]
    fn report_kind_as_str_roundtrip() {
        for kind in ReportKind::all() {
            let parsed = ReportKind::try_from(kind.as_str()).expect("roundtrip should succeed");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn unknown_report_kind_error() {
        let err = ReportKind::try_from("weekly").unwrap_err();
        assert!(err.to_string().contains("Unknown report kind"));
    }

    #[test]
    fn aggregates_group_by_calendar_date_in_order() {
        let entries = vec![
            entry(25, 9, 18.0, "clear sky"),
            entry(25, 12, 22.0, "clear sky"),
            entry(26, 9, 15.0, "light rain"),
        ];

        let aggregates = DailyAggregate::from_entries(&entries, 5);

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].date, NaiveDate::from_ymd_opt(2026, 8, 25).unwrap());
        assert_eq!(aggregates[0].avg_temp_c, 20.0);
        assert_eq!(aggregates[1].date, NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
        assert_eq!(aggregates[1].avg_temp_c, 15.0);
    }

    #[test]
    fn aggregate_count_never_exceeds_requested_days() {
        let entries: Vec<ForecastEntry> =
            (1..=6).map(|day| entry(day, 12, 20.0, "clear sky")).collect();

        let aggregates = DailyAggregate::from_entries(&entries, 5);

        assert_eq!(aggregates.len(), 5);
    }

    #[test]
    fn average_temperature_rounds_to_one_decimal() {
        let entries = vec![
            entry(25, 9, 18.14, "clear sky"),
            entry(25, 12, 18.33, "clear sky"),
        ];

        let aggregates = DailyAggregate::from_entries(&entries, 1);

        // (18.14 + 18.33) / 2 = 18.235 -> 18.2
        assert_eq!(aggregates[0].avg_temp_c, 18.2);
    }

    #[test]
    fn dominant_description_is_most_frequent_and_capitalized() {
        let entries = vec![
            entry(25, 9, 10.0, "rain"),
            entry(25, 12, 11.0, "rain"),
            entry(25, 15, 12.0, "clear"),
        ];

        let aggregates = DailyAggregate::from_entries(&entries, 1);

        assert_eq!(aggregates[0].description, "Rain");
    }

    #[test]
    fn dominant_description_tie_goes_to_first_encountered() {
        let entries = vec![
            entry(25, 9, 10.0, "overcast clouds"),
            entry(25, 12, 11.0, "light rain"),
        ];

        let aggregates = DailyAggregate::from_entries(&entries, 1);

        assert_eq!(aggregates[0].description, "Overcast clouds");
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("clear sky"), "Clear sky");
        assert_eq!(capitalize("ясно"), "Ясно");
    }
}
