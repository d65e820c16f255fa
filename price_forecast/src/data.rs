//! Daily price series handling

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One trading day as delivered by a provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Close price, `None` when the provider had no value
    pub close: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: Option<f64>) -> Self {
        Self { date, close }
    }

    /// Close price if present and finite
    pub fn clean_close(&self) -> Option<f64> {
        self.close.filter(|value| value.is_finite())
    }
}

/// Close prices for one symbol, keyed by strictly increasing dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    /// Symbol the prices belong to
    symbol: String,
    /// Observations in ascending date order
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series, rejecting unordered or duplicate dates
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        if let Some(pair) = points.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(ForecastError::DataError(format!(
                "Dates must be strictly increasing: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    /// A series without observations
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Create a series from parallel date and close vectors
    pub fn from_closes(
        symbol: impl Into<String>,
        dates: Vec<NaiveDate>,
        closes: Vec<f64>,
    ) -> Result<Self> {
        if dates.len() != closes.len() {
            return Err(ForecastError::DataError(format!(
                "Got {} dates but {} closes",
                dates.len(),
                closes.len()
            )));
        }

        let points = dates
            .into_iter()
            .zip(closes)
            .map(|(date, close)| PricePoint::new(date, Some(close)))
            .collect();

        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Number of points whose close is missing or not finite
    pub fn missing_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.clean_close().is_none())
            .count()
    }

    /// Copy of the series without missing or non-finite closes
    pub fn cleaned(&self) -> PriceSeries {
        PriceSeries {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.clean_close().is_some())
                .copied()
                .collect(),
        }
    }

    /// Clean close prices in date order
    pub fn close_prices(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.clean_close()).collect()
    }

    /// Observations dated within `start..=end`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        PriceSeries {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }
}

/// Data loader for price files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a price series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, symbol: &str) -> Result<PriceSeries> {
        let file = File::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "reading price file");
        Self::from_reader(file, symbol)
    }

    /// Load a price series from any CSV source with a header row
    ///
    /// Rows may arrive in any order; they are sorted by date. Empty or
    /// unparsable close cells become missing values.
    pub fn from_reader<R: Read>(reader: R, symbol: &str) -> Result<PriceSeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let date_idx = Self::detect_date_column(&headers)?;
        let close_idx = Self::detect_close_column(&headers)?;

        let mut points = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            let date = parse_date(raw_date).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Unparsable date '{}' on data row {}",
                    raw_date,
                    row + 1
                ))
            })?;
            let close = record
                .get(close_idx)
                .and_then(|raw| raw.parse::<f64>().ok());
            points.push(PricePoint::new(date, close));
        }

        points.sort_by_key(|p| p.date);
        PriceSeries::new(symbol, points)
    }

    /// Find the date column in the header row
    fn detect_date_column(headers: &csv::StringRecord) -> Result<usize> {
        headers
            .iter()
            .position(|name| {
                let lower = name.to_lowercase();
                lower.contains("date") || lower.contains("time")
            })
            .ok_or_else(|| ForecastError::DataError("No date column found in data".to_string()))
    }

    /// Find the close column, falling back to any price column
    fn detect_close_column(headers: &csv::StringRecord) -> Result<usize> {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        lowered
            .iter()
            .position(|name| name == "close")
            .or_else(|| {
                lowered
                    .iter()
                    .position(|name| name.contains("close") && !name.contains("adj"))
            })
            .or_else(|| lowered.iter().position(|name| name.contains("close")))
            .or_else(|| lowered.iter().position(|name| name.contains("price")))
            .ok_or_else(|| ForecastError::DataError("No price columns found in data".to_string()))
    }
}

/// Parse a date in one of the common export formats
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // Timestamps such as "2023-01-05 00:00:00" keep only their date part
    let head = raw.split([' ', 'T']).next().unwrap_or(raw);

    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(head, "%m/%d/%Y").ok())
        .or_else(|| NaiveDate::parse_from_str(head, "%Y/%m/%d").ok())
}
