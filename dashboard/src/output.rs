//! Terminal tables and files written by the commands.

use price_forecast::config::Instrument;
use price_forecast::{ForecastReport, ForecastSeries, PriceSeries};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::CliError;

pub fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}

/// Write the CSV download and both chart documents into `dir`
///
/// Everything is rendered before the first file is written; an I/O failure
/// midway keeps the files already written.
pub fn write_report(dir: &Path, report: &ForecastReport) -> Result<Vec<PathBuf>, CliError> {
    let symbol = report.forecast.symbol();
    let files = vec![
        (
            dir.join(&report.artifact.filename),
            report.artifact.bytes.clone(),
        ),
        (
            dir.join(format!("{symbol}_history.json")),
            report.history_chart.to_json()?.into_bytes(),
        ),
        (
            dir.join(format!("{symbol}_comparison.json")),
            report.comparison_chart.to_json()?.into_bytes(),
        ),
    ];

    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        fs::write(&path, bytes)?;
        written.push(path);
    }
    Ok(written)
}

pub fn write_forecast_table<W: Write>(out: &mut W, forecast: &ForecastSeries) -> io::Result<()> {
    writeln!(
        out,
        "{} {} forecast, {} days",
        forecast.symbol(),
        forecast.order(),
        forecast.len()
    )?;
    let band = format!("{:.0}%", forecast.confidence_level() * 100.0);
    writeln!(
        out,
        "{:<12} {:>12} {:>12} {:>12}",
        "Date",
        "Forecast",
        format!("Lower {band}"),
        format!("Upper {band}")
    )?;
    for point in forecast.points() {
        writeln!(
            out,
            "{:<12} {:>12.2} {:>12.2} {:>12.2}",
            point.date.format("%Y-%m-%d").to_string(),
            point.value,
            point.lower,
            point.upper
        )?;
    }
    Ok(())
}

pub fn write_series_summary<W: Write>(out: &mut W, series: &PriceSeries) -> io::Result<()> {
    let closes = series.close_prices();
    let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
        return writeln!(out, "{}: no prices", series.symbol());
    };
    let low = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let high = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    writeln!(
        out,
        "{}: {} prices from {} to {}, low {:.2}, high {:.2}",
        series.symbol(),
        series.len(),
        first,
        last,
        low,
        high
    )
}

pub fn write_instruments<W: Write>(out: &mut W, instruments: &[Instrument]) -> io::Result<()> {
    writeln!(out, "{:<10} {:<8} Name", "Key", "Symbol")?;
    for instrument in instruments {
        writeln!(
            out,
            "{:<10} {:<8} {}",
            instrument.key(),
            instrument.symbol(),
            instrument.display_name()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use price_forecast::providers::RandomWalkProvider;
    use price_forecast::{ForecastDashboard, ForecastRequest};
    use tempfile::tempdir;

    fn report() -> ForecastReport {
        let request = ForecastRequest::new(
            "RW",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 10).unwrap(),
            7,
        )
        .unwrap();
        ForecastDashboard::new(RandomWalkProvider::new(Some(11)))
            .handle(&request)
            .unwrap()
    }

    #[test]
    fn test_write_report_files() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested");
        let report = report();

        let written = write_report(&out, &report).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["RW_forecast.csv", "RW_history.json", "RW_comparison.json"]
        );

        let csv = fs::read_to_string(out.join("RW_forecast.csv")).unwrap();
        assert!(csv.starts_with("Date,Forecasted Price\n2023-04-11,"));
        assert_eq!(csv.lines().count(), 8);
    }

    #[test]
    fn test_forecast_table() {
        let mut buffer = Vec::new();
        write_forecast_table(&mut buffer, &report().forecast).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("RW ARIMA(5,1,0) forecast, 7 days\n"));
        assert!(text.contains("Lower 95%"));
        assert_eq!(text.lines().count(), 9);
        assert!(text.lines().nth(2).unwrap().starts_with("2023-04-11"));
    }

    #[test]
    fn test_instruments_table() {
        let mut buffer = Vec::new();
        write_instruments(&mut buffer, &Instrument::ALL).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("sp500      ^GSPC    S&P 500"));
    }

    #[test]
    fn test_empty_series_summary() {
        let mut buffer = Vec::new();
        write_series_summary(&mut buffer, &PriceSeries::empty("X")).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "X: no prices\n");
    }
}
