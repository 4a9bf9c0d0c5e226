use crate::error::JobError;

use csv::StringRecord;
use sensorpipe_core::constants::columns;

/// Positions of the input columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSchema {
    pub location: usize,
    pub measurement_time: usize,
    pub temperature_c: usize,
    pub humidity_pct: usize,
    pub co2_ppm: usize,
}

impl InputSchema {
    /// Resolves every input column by exact name. Extra columns are ignored.
    pub fn from_header(header: &StringRecord) -> Result<Self, JobError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| JobError::Schema(format!("column '{name}' not found in header")))
        };

        Ok(Self {
            location: find(columns::LOCATION)?,
            measurement_time: find(columns::MEASUREMENT_TIME)?,
            temperature_c: find(columns::TEMPERATURE_C)?,
            humidity_pct: find(columns::HUMIDITY_PCT)?,
            co2_ppm: find(columns::CO2_PPM)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_columns_in_any_order() {
        let header = StringRecord::from(vec![
            "co2_ppm",
            "sensor_id",
            "measurement_time",
            "location",
            "humidity_pct",
            "temperature_c",
        ]);
        let schema = InputSchema::from_header(&header).unwrap();
        assert_eq!(
            schema,
            InputSchema {
                location: 3,
                measurement_time: 2,
                temperature_c: 5,
                humidity_pct: 4,
                co2_ppm: 0,
            }
        );
    }

    #[test]
    fn missing_measurement_time_is_schema_error() {
        let header = StringRecord::from(vec!["location", "temperature_c", "humidity_pct", "co2_ppm"]);
        let err = InputSchema::from_header(&header).unwrap_err();
        assert!(matches!(err, JobError::Schema(msg) if msg.contains("measurement_time")));
    }

    #[test]
    fn names_are_case_sensitive() {
        let header = StringRecord::from(vec![
            "Location",
            "measurement_time",
            "temperature_c",
            "humidity_pct",
            "co2_ppm",
        ]);
        assert!(InputSchema::from_header(&header).is_err());
    }
}
