//! Daily closes from the Yahoo Finance chart endpoint

use super::DataProvider;
use crate::config::{DEFAULT_HTTP_TIMEOUT_SECS, YAHOO_CHART_URL};
use crate::data::{PricePoint, PriceSeries};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("price-dashboard/", env!("CARGO_PKG_VERSION"));
const NOT_FOUND_CODE: &str = "Not Found";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Blocking client for the public chart API
#[derive(Debug, Clone)]
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: YAHOO_CHART_URL.to_string(),
        })
    }

    /// Point the client at another host, e.g. a local mock
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request URL covering `start` through `end`, both inclusive
    pub fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end
            .checked_add_days(Days::new(1))
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();

        format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(symbol),
            period1,
            period2
        )
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let url = self.chart_url(symbol, start, end);
        debug!(%url, "requesting chart");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;

        // Unknown symbols come back as 404 with a chart error body
        if !status.is_success() && !body.contains(NOT_FOUND_CODE) {
            return Err(ForecastError::DataFetchError(format!(
                "Chart request for {} failed with HTTP {}",
                symbol, status
            )));
        }

        let series = parse_chart_response(symbol, &body)?;
        Ok(series.between(start, end))
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: YAHOO_CHART_URL.to_string(),
        }
    }
}

/// Decode a chart payload into a daily series
///
/// Timestamps are shifted by the exchange's GMT offset before taking the
/// date. A "Not Found" error or an empty result yields an empty series.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<PriceSeries> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| ForecastError::DataFetchError(format!("Malformed chart response: {}", e)))?;

    if let Some(error) = response.chart.error {
        if error.code == NOT_FOUND_CODE {
            warn!(symbol, "no chart data for symbol");
            return Ok(PriceSeries::empty(symbol));
        }
        return Err(ForecastError::DataFetchError(format!(
            "Chart API error {}: {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        warn!(symbol, "chart response carried no result");
        return Ok(PriceSeries::empty(symbol));
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

    if timestamps.len() != closes.len() {
        return Err(ForecastError::DataFetchError(format!(
            "Chart for {} has {} timestamps but {} closes",
            symbol,
            timestamps.len(),
            closes.len()
        )));
    }

    // Intraday refreshes can repeat a date; the later entry wins
    let mut by_date = BTreeMap::new();
    for (ts, close) in timestamps.into_iter().zip(closes) {
        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| {
                ForecastError::DataFetchError(format!("Invalid timestamp {} in chart", ts))
            })?
            .date_naive();
        by_date.insert(date, close);
    }

    if by_date.is_empty() {
        warn!(symbol, "chart response carried no prices");
    }

    let points = by_date
        .into_iter()
        .map(|(date, close)| PricePoint::new(date, close))
        .collect();
    PriceSeries::new(symbol, points)
}
