use crate::aggregate::HourlyAggregate;
use crate::error::JobError;

use bytes::Bytes;
use csv::WriterBuilder;
use sensorpipe_core::constants::columns;

/// Formats a double the way the upstream engine writes them: `21.0`, `0.001`, `1.0E7`, `1.5E-4`.
pub fn format_double(value: f64) -> String {
    let abs = value.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        let s = value.to_string();
        if s.contains('.') { s } else { format!("{s}.0") }
    } else {
        let s = format!("{value:e}");
        let (mantissa, exponent) = s.split_once('e').unwrap_or((&s, "0"));
        if mantissa.contains('.') {
            format!("{mantissa}E{exponent}")
        } else {
            format!("{mantissa}.0E{exponent}")
        }
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_double).unwrap_or_default()
}

/// Encodes the aggregate table as one CSV document, header first. Missing averages are empty fields.
pub fn encode_csv(rows: &[HourlyAggregate]) -> Result<Bytes, JobError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(columns::OUTPUT)?;

    for row in rows {
        writer.write_record([
            row.location.clone(),
            row.hour.to_string(),
            format_optional(row.avg_temperature_c),
            format_optional(row.avg_co2_ppm),
        ])?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| JobError::Csv(e.into_error().into()))?;
    Ok(Bytes::from(data))
}
