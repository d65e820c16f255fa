//! CSV download of a forecast

use crate::config::EXPORT_MIME_TYPE;
use crate::error::{ForecastError, Result};
use crate::forecast::ForecastSeries;
use serde::Serialize;

pub const DATE_HEADER: &str = "Date";
pub const FORECAST_HEADER: &str = "Forecasted Price";

/// A file offered for download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Serialize a forecast as `Date,Forecasted Price` rows
///
/// Values use the shortest decimal form that round-trips, so the same
/// forecast always yields the same bytes.
pub fn to_csv(forecast: &ForecastSeries) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([DATE_HEADER, FORECAST_HEADER])?;
    for point in forecast.points() {
        writer.write_record([
            point.date.format("%Y-%m-%d").to_string(),
            point.value.to_string(),
        ])?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|e| ForecastError::DataError(format!("Failed to finish CSV export: {}", e)))
}

/// Name of the download for a symbol
pub fn export_filename(symbol: &str) -> String {
    format!("{}_forecast.csv", symbol)
}

/// CSV bytes together with the file name and MIME type
pub fn export_artifact(forecast: &ForecastSeries) -> Result<ExportArtifact> {
    Ok(ExportArtifact {
        filename: export_filename(forecast.symbol()),
        mime_type: EXPORT_MIME_TYPE.to_string(),
        bytes: to_csv(forecast)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastPoint;
    use crate::models::ArimaOrder;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample() -> ForecastSeries {
        let point = |day, value| ForecastPoint {
            date: NaiveDate::from_ymd_opt(2023, 4, day).unwrap(),
            value,
            lower: value - 1.0,
            upper: value + 1.0,
        };
        ForecastSeries::from_points(
            "AAPL",
            ArimaOrder::new(5, 1, 0),
            0.95,
            vec![point(11, 101.23), point(12, 101.50)],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let bytes = to_csv(&sample()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Date,Forecasted Price\n2023-04-11,101.23\n2023-04-12,101.5\n"
        );
    }

    #[test]
    fn test_export_is_deterministic() {
        let forecast = sample();
        assert_eq!(to_csv(&forecast).unwrap(), to_csv(&forecast).unwrap());
    }

    #[test]
    fn test_artifact_metadata() {
        let artifact = export_artifact(&sample()).unwrap();
        assert_eq!(artifact.filename, "AAPL_forecast.csv");
        assert_eq!(artifact.mime_type, "text/csv");
        assert!(artifact.bytes.starts_with(b"Date,Forecasted Price\n"));
    }

    #[test]
    fn test_empty_forecast_has_header_only() {
        let empty =
            ForecastSeries::from_points("MSFT", ArimaOrder::new(5, 1, 0), 0.95, vec![]).unwrap();
        assert_eq!(to_csv(&empty).unwrap(), b"Date,Forecasted Price\n".to_vec());
    }
}
