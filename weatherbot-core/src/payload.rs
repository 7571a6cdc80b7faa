//! Callback payload codec. Buttons smuggle the resolved coordinates through
//! the chat platform so a press never re-runs geocoding. The payload is a
//! versioned fixed-field string; decoding validates every field instead of
//! silently corrupting them.

use thiserror::Error;

use crate::model::ReportKind;

/// Field delimiter of the wire form. City names must not contain it; encoding
/// rejects them instead of producing an undecodable payload.
const DELIMITER: char = ':';

/// Schema version, the leading field of every payload.
const VERSION: &str = "1";

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("city name {0:?} contains the field delimiter")]
    DelimiterInCity(String),

    #[error("unsupported payload version {0:?}")]
    UnsupportedVersion(String),

    #[error("expected 6 payload fields, got {0}")]
    FieldCount(usize),

    #[error("unknown report kind {0:?}")]
    UnknownKind(String),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// State carried through one button press: which report to build, for which
/// city, at which coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackPayload {
    pub kind: ReportKind,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Hours for hourly reports, days for daily ones; unused for current.
    pub count: u32,
}

impl CallbackPayload {
    /// Wire form: `1:<kind>:<city>:<lat>:<lon>:<count>`.
    pub fn encode(&self) -> Result<String, PayloadError> {
        if self.city.contains(DELIMITER) {
            return Err(PayloadError::DelimiterInCity(self.city.clone()));
        }

        Ok(format!(
            "{VERSION}:{}:{}:{}:{}:{}",
            self.kind, self.city, self.latitude, self.longitude, self.count
        ))
    }

    pub fn decode(data: &str) -> Result<Self, PayloadError> {
        let fields: Vec<&str> = data.split(DELIMITER).collect();
        if fields.len() != 6 {
            return Err(PayloadError::FieldCount(fields.len()));
        }
        if fields[0] != VERSION {
            return Err(PayloadError::UnsupportedVersion(fields[0].to_string()));
        }

        let kind = ReportKind::try_from(fields[1])
            .map_err(|_| PayloadError::UnknownKind(fields[1].to_string()))?;

        Ok(Self {
            kind,
            city: fields[2].to_string(),
            latitude: parse_coord(fields[3])?,
            longitude: parse_coord(fields[4])?,
            count: fields[5]
                .parse()
                .map_err(|_| PayloadError::InvalidNumber(fields[5].to_string()))?,
        })
    }
}

fn parse_coord(field: &str) -> Result<f64, PayloadError> {
    field
        .parse()
        .map_err(|_| PayloadError::InvalidNumber(field.to_string()))
}
