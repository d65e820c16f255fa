//! Forecasting models for price series

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::fmt::{self, Debug};

/// ARIMA order `(p, d, q)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ArimaOrder {
    /// Autoregressive terms
    pub p: usize,
    /// Differencing degree
    pub d: usize,
    /// Moving-average terms
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Smallest number of clean observations the order can be fitted on
    ///
    /// Pure AR orders need `p + 1` regression rows after differencing and
    /// lagging. With MA terms the long autoregression of the first stage
    /// consumes another `p + q` observations.
    pub fn min_observations(&self) -> usize {
        if self.q == 0 {
            self.d + 2 * self.p + 1
        } else {
            self.d + 3 * (self.p + self.q) + 1
        }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Forecast result containing predicted values
#[derive(Debug, Clone)]
pub struct ForecastResult {
    /// Forecasted values
    pub(crate) values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Prediction intervals (optional)
    pub(crate) intervals: Option<Vec<(f64, f64)>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::InvalidParameter(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            intervals: None,
        })
    }

    /// Create a new forecast result with prediction intervals
    pub fn new_with_intervals(
        values: Vec<f64>,
        horizons: usize,
        intervals: Vec<(f64, f64)>,
    ) -> Result<Self> {
        let mut result = Self::new(values, horizons)?;

        if intervals.len() != horizons {
            return Err(ForecastError::InvalidParameter(format!(
                "Intervals length ({}) doesn't match horizons ({})",
                intervals.len(),
                horizons
            )));
        }

        result.intervals = Some(intervals);
        Ok(result)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the prediction intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// One-step-ahead fitted values over the training sample
    fn predict(&self) -> Vec<f64>;

    /// Variance of the in-sample one-step residuals
    fn residual_variance(&self) -> f64;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a price series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a price series
    fn train(&self, data: &PriceSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ArimaOrder::new(5, 1, 0), 12)]
    #[case(ArimaOrder::new(0, 1, 0), 2)]
    #[case(ArimaOrder::new(1, 0, 1), 7)]
    #[case(ArimaOrder::new(2, 2, 2), 15)]
    fn test_min_observations(#[case] order: ArimaOrder, #[case] expected: usize) {
        assert_eq!(order.min_observations(), expected);
    }

    #[test]
    fn test_result_length_must_match_horizon() {
        assert!(ForecastResult::new(vec![1.0, 2.0], 3).is_err());
        assert!(ForecastResult::new_with_intervals(vec![1.0], 1, vec![]).is_err());

        let result = ForecastResult::new_with_intervals(vec![1.0], 1, vec![(0.5, 1.5)]).unwrap();
        assert_eq!(result.horizons(), 1);
        assert_eq!(result.intervals(), Some(&[(0.5, 1.5)][..]));
    }
}
