//! # Price Dashboard
//!
//! Workspace facade over the numerical kernels and the forecasting library.
//! The `price-dashboard` binary lives in the `dashboard` member.
//!
//! ```
//! use price_dash_workspace::price_forecast::config::DEFAULT_ARIMA_ORDER;
//!
//! assert_eq!(DEFAULT_ARIMA_ORDER.to_string(), "ARIMA(5,1,0)");
//! ```

pub use price_forecast;
pub use trade_math;
