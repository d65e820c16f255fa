//! # Price Forecast
//!
//! Daily closing prices, a fixed-order ARIMA forecaster and the pieces the
//! stock dashboards are made of.
//!
//! ## Features
//!
//! - Price series with gaps and missing closes (`PriceSeries`)
//! - Price sources: Yahoo Finance chart API, local CSV files, seeded random walks
//! - ARIMA(p,d,q) fitting by conditional least squares with prediction intervals
//! - Calendar-daily forecast index (weekends included)
//! - Renderer-neutral chart descriptions and a CSV download
//!
//! ## Forecast Dates
//!
//! Forecasts start the day after the last clean observation and advance one
//! calendar day at a time, so a Friday close is followed by Saturday and
//! Sunday forecasts:
//!
//! ```rust
//! use chrono::{Days, NaiveDate};
//! use price_forecast::config::DEFAULT_ARIMA_ORDER;
//! use price_forecast::{forecast, PriceSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let dates = (0..100).map(|i| start + Days::new(i)).collect();
//! let series = PriceSeries::from_closes("AAPL", dates, vec![100.0; 100])?;
//!
//! let result = forecast(&series, 5, DEFAULT_ARIMA_ORDER)?;
//! assert_eq!(result.first_date(), NaiveDate::from_ymd_opt(2023, 4, 11));
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use price_forecast::providers::YahooProvider;
//! use price_forecast::{ForecastDashboard, ForecastRequest};
//! use std::time::Duration;
//!
//! let provider = YahooProvider::new(Duration::from_secs(30))?;
//! let dashboard = ForecastDashboard::new(provider);
//!
//! let request = ForecastRequest::new(
//!     "AAPL",
//!     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2023, 4, 10).unwrap(),
//!     30,
//! )?;
//! let report = dashboard.handle(&request)?;
//!
//! std::fs::write(&report.artifact.filename, &report.artifact.bytes)?;
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod export;
pub mod forecast;
pub mod models;
pub mod providers;
pub mod utils;

// Re-export commonly used types
pub use crate::chart::ChartSpec;
pub use crate::config::Instrument;
pub use crate::dashboard::{ForecastDashboard, ForecastReport, ForecastRequest, RandomWalkDashboard};
pub use crate::data::{DataLoader, PricePoint, PriceSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::export::{export_artifact, to_csv, ExportArtifact};
pub use crate::forecast::{forecast, ForecastPoint, ForecastSeries, Forecaster};
pub use crate::models::{ArimaOrder, ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::providers::DataProvider;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
