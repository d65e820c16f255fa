//! Request handlers behind the two dashboards
//!
//! Each call is independent: fetch, forecast, then build the charts and the
//! download. Nothing is cached between requests.

use crate::chart::{comparison_chart, history_chart, random_walk_chart, ChartSpec};
use crate::config::{
    DEFAULT_ARIMA_ORDER, RANDOM_WALK_BASE_PRICE, RANDOM_WALK_PERIODS, RANDOM_WALK_START_DATE,
};
use crate::data::{parse_date, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::export::{export_artifact, ExportArtifact};
use crate::forecast::{ForecastSeries, Forecaster};
use crate::models::ArimaOrder;
use crate::providers::{random_walk, DataProvider};
use chrono::NaiveDate;
use rand::Rng;
use tracing::info;

/// A validated forecast request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    symbol: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    horizon_days: usize,
    model_order: ArimaOrder,
}

impl ForecastRequest {
    /// Request with the default model order
    pub fn new(
        symbol: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        horizon_days: usize,
    ) -> Result<Self> {
        Self::with_order(symbol, start_date, end_date, horizon_days, DEFAULT_ARIMA_ORDER)
    }

    pub fn with_order(
        symbol: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        horizon_days: usize,
        model_order: ArimaOrder,
    ) -> Result<Self> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Symbol must not be empty".to_string(),
            ));
        }
        // The symbol names the exported files
        if symbol.contains(['/', '\\']) || symbol.contains("..") {
            return Err(ForecastError::InvalidParameter(format!(
                "Symbol '{}' must not contain path separators or '..'",
                symbol
            )));
        }
        if start_date > end_date {
            return Err(ForecastError::InvalidParameter(format!(
                "Start date {} is after end date {}",
                start_date, end_date
            )));
        }
        if horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least one day".to_string(),
            ));
        }

        Ok(Self {
            symbol,
            start_date,
            end_date,
            horizon_days,
            model_order,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    pub fn model_order(&self) -> ArimaOrder {
        self.model_order
    }
}

/// Everything the forecast dashboard shows for one request
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub history: PriceSeries,
    pub history_chart: ChartSpec,
    pub forecast: ForecastSeries,
    pub comparison_chart: ChartSpec,
    pub artifact: ExportArtifact,
}

/// Forecast dashboard bound to one price source
#[derive(Debug)]
pub struct ForecastDashboard<P: DataProvider> {
    provider: P,
}

impl<P: DataProvider> ForecastDashboard<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one request end to end
    pub fn handle(&self, request: &ForecastRequest) -> Result<ForecastReport> {
        info!(
            symbol = request.symbol(),
            source = self.provider.name(),
            start = %request.start_date(),
            end = %request.end_date(),
            "fetching prices"
        );

        let history = self
            .provider
            .fetch(request.symbol(), request.start_date(), request.end_date())
            .map_err(|e| match e {
                ForecastError::DataFetchError(_) => e,
                other => ForecastError::DataFetchError(format!(
                    "{} provider failed for {}: {}",
                    self.provider.name(),
                    request.symbol(),
                    other
                )),
            })?;

        info!(
            symbol = request.symbol(),
            observations = history.len(),
            "prices fetched"
        );

        let history_chart = history_chart(&history);
        let forecast =
            Forecaster::new(request.model_order()).forecast(&history, request.horizon_days())?;
        let comparison_chart = comparison_chart(&history, &forecast);
        let artifact = export_artifact(&forecast)?;

        Ok(ForecastReport {
            history,
            history_chart,
            forecast,
            comparison_chart,
            artifact,
        })
    }
}

/// The random-walk dashboard: one synthetic series and its chart
#[derive(Debug, Clone)]
pub struct RandomWalkDashboard {
    start: NaiveDate,
    periods: usize,
    base: f64,
}

impl RandomWalkDashboard {
    pub fn new(start: NaiveDate, periods: usize) -> Self {
        Self {
            start,
            periods,
            base: RANDOM_WALK_BASE_PRICE,
        }
    }

    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(PriceSeries, ChartSpec)> {
        let series = random_walk("RANDOM", self.start, self.periods, self.base, rng)?;
        let chart = random_walk_chart(&series);
        Ok((series, chart))
    }
}

impl Default for RandomWalkDashboard {
    fn default() -> Self {
        // The constant is a valid ISO date; fall back to the epoch otherwise
        let start = parse_date(RANDOM_WALK_START_DATE).unwrap_or_default();
        Self::new(start, RANDOM_WALK_PERIODS)
    }
}
