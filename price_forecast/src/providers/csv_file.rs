//! Prices from a local CSV export

use super::DataProvider;
use crate::data::{DataLoader, PriceSeries};
use crate::error::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::debug;

/// Reads closes from a local CSV file with `Date` and `Close` columns
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let series = DataLoader::from_csv(&self.path, symbol)?;
        let window = series.between(start, end);
        debug!(
            path = %self.path.display(),
            rows = series.len(),
            kept = window.len(),
            "loaded csv prices"
        );
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_fetch_filters_inclusive_range() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Close").unwrap();
        writeln!(file, "2023-01-02,10.0").unwrap();
        writeln!(file, "2023-01-03,11.0").unwrap();
        writeln!(file, "2023-01-04,12.0").unwrap();
        writeln!(file, "2023-01-05,13.0").unwrap();
        file.flush().unwrap();

        let provider = CsvProvider::new(file.path());
        let series = provider
            .fetch(
                "TEST",
                NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2023, 1, 4).unwrap(),
            )
            .unwrap();

        assert_eq!(series.symbol(), "TEST");
        assert_eq!(series.close_prices(), vec![11.0, 12.0]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let provider = CsvProvider::new("/nonexistent/prices.csv");
        let day = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        assert!(provider.fetch("TEST", day, day).is_err());
    }
}
