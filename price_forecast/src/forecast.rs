//! Dated forecasts built on top of the ARIMA model

use crate::config::{DEFAULT_CONFIDENCE_LEVEL, FORECAST_STEP};
use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaModel;
use crate::models::{ArimaOrder, ForecastModel, TrainedForecastModel};
use crate::utils::future_dates;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Point forecast
    pub value: f64,
    /// Lower bound of the prediction interval
    pub lower: f64,
    /// Upper bound of the prediction interval
    pub upper: f64,
}

/// Forecast for the days following a price series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    symbol: String,
    order: ArimaOrder,
    confidence_level: f64,
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Build a forecast from dated points one calendar day apart
    pub fn from_points(
        symbol: impl Into<String>,
        order: ArimaOrder,
        confidence_level: f64,
        points: Vec<ForecastPoint>,
    ) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[0].date.checked_add_days(FORECAST_STEP) != Some(pair[1].date) {
                return Err(ForecastError::DataError(format!(
                    "Forecast dates must be consecutive days: {} is followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            order,
            confidence_level,
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn points(&self) -> &[ForecastPoint] {
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
}

/// Fits a fixed-order ARIMA and extends a series by `horizon` days
#[derive(Debug, Clone)]
pub struct Forecaster {
    order: ArimaOrder,
    confidence_level: f64,
    step: Days,
}

impl Forecaster {
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            order,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            step: FORECAST_STEP,
        }
    }

    /// Set the coverage of the prediction interval
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Forecast the `horizon_days` days after the last clean observation
    pub fn forecast(&self, series: &PriceSeries, horizon_days: usize) -> Result<ForecastSeries> {
        if horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least one day".to_string(),
            ));
        }

        let dropped = series.missing_count();
        if dropped > 0 {
            warn!(
                symbol = series.symbol(),
                dropped, "dropping missing prices before fitting"
            );
        }

        let cleaned = series.cleaned();
        let origin = cleaned.last_date().ok_or_else(|| {
            ForecastError::InsufficientDataError(format!(
                "No clean observations for {}",
                series.symbol()
            ))
        })?;

        let model = ArimaModel::new(self.order).with_confidence_level(self.confidence_level)?;
        let trained = model.train(&cleaned)?;
        let result = trained.forecast(horizon_days)?;
        let dates = future_dates(origin, horizon_days, self.step)?;

        let intervals = result
            .intervals()
            .map(|bands| bands.to_vec())
            .unwrap_or_else(|| result.values().iter().map(|v| (*v, *v)).collect());

        let points = dates
            .into_iter()
            .zip(result.values().iter())
            .zip(intervals)
            .map(|((date, value), (lower, upper))| ForecastPoint {
                date,
                value: *value,
                lower,
                upper,
            })
            .collect::<Vec<_>>();

        info!(
            symbol = series.symbol(),
            model = trained.name(),
            observations = cleaned.len(),
            horizon_days,
            "forecast produced"
        );

        ForecastSeries::from_points(series.symbol(), self.order, self.confidence_level, points)
    }
}

/// Forecast `horizon_days` calendar days past the end of `series`
pub fn forecast(
    series: &PriceSeries,
    horizon_days: usize,
    order: ArimaOrder,
) -> Result<ForecastSeries> {
    Forecaster::new(order).forecast(series, horizon_days)
}
