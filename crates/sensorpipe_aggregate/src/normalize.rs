use crate::error::ParseError;
use crate::schema::InputSchema;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use csv::StringRecord;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One input row after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub location: String,
    /// `None` if `measurement_time` could not be parsed.
    pub hour: Option<u32>,
    pub temperature_c: Option<f64>,
    /// Normalized but not aggregated.
    pub humidity_pct: Option<f64>,
    pub co2_ppm: Option<f64>,
}

impl SensorReading {
    /// Normalizes a raw record. Never fails: bad fields become `None`.
    ///
    /// Short rows are tolerated, absent trailing fields read as empty.
    pub fn from_record(record: &StringRecord, schema: &InputSchema) -> Self {
        let field = |i: usize| record.get(i).unwrap_or("");

        Self {
            location: field(schema.location).to_string(),
            hour: parse_hour(field(schema.measurement_time)).ok(),
            temperature_c: parse_measurement(field(schema.temperature_c)),
            humidity_pct: parse_measurement(field(schema.humidity_pct)),
            co2_ppm: parse_measurement(field(schema.co2_ppm)),
        }
    }

    /// Number of measurement fields that normalized to a missing value.
    pub fn missing_values(&self) -> usize {
        [self.temperature_c, self.humidity_pct, self.co2_ppm]
            .iter()
            .filter(|v| v.is_none())
            .count()
    }
}

/// Parses a numeric measurement. Blank, non-numeric and non-finite text is missing.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extracts the hour of day as written in the timestamp. No timezone conversion.
pub fn parse_hour(raw: &str) -> Result<u32, ParseError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.hour());
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(dt.hour());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|_| 0)
        .map_err(|_| ParseError::Timestamp(raw.to_string()))
}
