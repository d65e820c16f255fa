//! ARIMA models for price forecasting
//!
//! The series is differenced `d` times (or centred on its mean when `d` is
//! zero) and an ARMA(p, q) is fitted to the result by conditional least
//! squares. Pure AR orders are a single regression. Orders with MA terms
//! start from a Hannan-Rissanen estimate that is refined with damped
//! Gauss-Newton steps on the conditional sum of squares.

use crate::config::{CONVERGENCE_TOLERANCE, DEFAULT_CONFIDENCE_LEVEL, MAX_ITERATIONS};
use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ArimaOrder, ForecastModel, ForecastResult, TrainedForecastModel};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;
use trade_math::{
    autocovariance, difference, integrate, least_squares, mean, solve_linear_system, variance,
};

/// Damping above which no descent direction is left to try
const MAX_DAMPING: f64 = 1e12;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// Model order
    order: ArimaOrder,
    /// Coverage of the prediction intervals
    confidence_level: f64,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    /// Model order
    order: ArimaOrder,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Constant removed before fitting, zero for differenced series
    mean: f64,
    /// Differenced and centred series the coefficients belong to
    working: Vec<f64>,
    /// Last value of every differencing level
    tails: Vec<f64>,
    /// One-step residuals on the working series
    residuals: Vec<f64>,
    /// Residual variance
    sigma2: f64,
    /// Coverage of the prediction intervals
    confidence_level: f64,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            name: order.to_string(),
            order,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }

    /// Set the coverage of the prediction intervals
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Result<Self> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Confidence level must be between 0 and 1, got {}",
                confidence_level
            )));
        }

        self.confidence_level = confidence_level;
        Ok(self)
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &PriceSeries) -> Result<TrainedArimaModel> {
        let prices = data.close_prices();
        if prices.is_empty() {
            return Err(ForecastError::InsufficientDataError(format!(
                "No clean observations for {}",
                data.symbol()
            )));
        }

        let required = self.order.min_observations();
        if prices.len() < required {
            return Err(ForecastError::InsufficientDataError(format!(
                "{} needs at least {} clean observations, have {}",
                self.name,
                required,
                prices.len()
            )));
        }

        let ArimaOrder { p, d, q } = self.order;
        let differenced = difference(&prices, d)?;
        let constant = if d == 0 {
            mean(&differenced.values)?
        } else {
            0.0
        };
        let working: Vec<f64> = differenced.values.iter().map(|v| v - constant).collect();

        let power = working.iter().map(|v| v * v).sum::<f64>() / working.len() as f64;
        let scale = prices.iter().map(|v| v * v).sum::<f64>() / prices.len() as f64;
        let flat = power <= f64::EPSILON * scale.max(1.0);

        let (ar_coefficients, ma_coefficients) = if flat || p + q == 0 {
            (vec![0.0; p], vec![0.0; q])
        } else if q == 0 {
            (fit_autoregression(&working, p)?, Vec::new())
        } else {
            let initial = hannan_rissanen(&working, p, q)?;
            let mut refined = refine_css(&working, p, initial)?;
            let ma = refined.split_off(p);
            (refined, ma)
        };

        let residuals = css_residuals(&working, &ar_coefficients, &ma_coefficients);
        let in_sample = &residuals[p..];
        let sigma2 = if in_sample.is_empty() {
            0.0
        } else {
            in_sample.iter().map(|e| e * e).sum::<f64>() / in_sample.len() as f64
        };

        let all_finite = ar_coefficients
            .iter()
            .chain(ma_coefficients.iter())
            .all(|c| c.is_finite());
        if !all_finite || !sigma2.is_finite() {
            return Err(ForecastError::ModelConvergenceError(format!(
                "{} estimation produced non-finite parameters",
                self.name
            )));
        }

        // Leftover lag-1 correlation hints at an order that is too small
        let residual_acf1 = variance(in_sample)
            .ok()
            .filter(|v| *v > 0.0)
            .and_then(|v| autocovariance(in_sample, 1).ok().map(|c| c / v));

        debug!(
            model = %self.name,
            observations = prices.len(),
            flat,
            residual_acf1 = ?residual_acf1,
            ar = ?ar_coefficients,
            ma = ?ma_coefficients,
            sigma2,
            "fitted model"
        );

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            ar_coefficients,
            ma_coefficients,
            mean: constant,
            working,
            tails: differenced.tails,
            residuals,
            sigma2,
            confidence_level: self.confidence_level,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let n = self.working.len();
        let mut history = self.working.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..horizon {
            let t = history.len();
            let mut next = 0.0;
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                next += phi * history[t - 1 - i];
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                next += theta * shocks[t - 1 - j];
            }
            history.push(next);
            // Future shocks have zero expectation
            shocks.push(0.0);
        }

        let centred: Vec<f64> = history[n..].iter().map(|v| v + self.mean).collect();
        let values = integrate(&centred, &self.tails);

        let z = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?
            .inverse_cdf(0.5 + self.confidence_level / 2.0);

        let mut cumulative = 0.0;
        let intervals = self
            .psi_weights(horizon)
            .iter()
            .zip(values.iter())
            .map(|(psi, value)| {
                cumulative += psi * psi;
                let half_width = z * (self.sigma2 * cumulative).sqrt();
                (value - half_width, value + half_width)
            })
            .collect::<Vec<(f64, f64)>>();

        let diverged = values
            .iter()
            .chain(intervals.iter().flat_map(|(lower, upper)| [lower, upper]))
            .any(|v| !v.is_finite());
        if diverged {
            return Err(ForecastError::ModelConvergenceError(format!(
                "{} forecast diverges within {} steps",
                self.name, horizon
            )));
        }

        ForecastResult::new_with_intervals(values, horizon, intervals)
    }

    /// Fitted values on the differenced scale; the first `p` entries have no
    /// complete lag window and repeat the observation
    fn predict(&self) -> Vec<f64> {
        self.working
            .iter()
            .zip(&self.residuals)
            .map(|(value, residual)| value - residual + self.mean)
            .collect()
    }

    fn residual_variance(&self) -> f64 {
        self.sigma2
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// MA(inf) weights of the integrated model, `psi[0] = 1`
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        // (1 - phi_1 B - ... - phi_p B^p)(1 - B)^d
        let mut polynomial = vec![1.0];
        polynomial.extend(self.ar_coefficients.iter().map(|phi| -phi));
        for _ in 0..self.order.d {
            let mut expanded = vec![0.0; polynomial.len() + 1];
            for (i, c) in polynomial.iter().enumerate() {
                expanded[i] += c;
                expanded[i + 1] -= c;
            }
            polynomial = expanded;
        }
        let phi_star: Vec<f64> = polynomial[1..].iter().map(|c| -c).collect();

        let mut psi = vec![0.0; horizon];
        for j in 0..horizon {
            if j == 0 {
                psi[0] = 1.0;
                continue;
            }
            let mut weight = self.ma_coefficients.get(j - 1).copied().unwrap_or(0.0);
            for i in 1..=j.min(phi_star.len()) {
                weight += phi_star[i - 1] * psi[j - i];
            }
            psi[j] = weight;
        }

        psi
    }
}

/// Conditional least squares fit of an AR(p) without intercept
fn fit_autoregression(series: &[f64], p: usize) -> Result<Vec<f64>> {
    let design: Vec<Vec<f64>> = (p..series.len())
        .map(|t| (1..=p).map(|lag| series[t - lag]).collect())
        .collect();
    let target = &series[p..];

    Ok(least_squares(&design, target)?)
}

/// Two-stage ARMA estimate: long AR residuals stand in for the shocks
fn hannan_rissanen(series: &[f64], p: usize, q: usize) -> Result<Vec<f64>> {
    let long_order = p + q;
    let long_ar = fit_autoregression(series, long_order)?;

    let mut innovations = vec![0.0; series.len()];
    for t in long_order..series.len() {
        let predicted: f64 = long_ar
            .iter()
            .enumerate()
            .map(|(i, phi)| phi * series[t - 1 - i])
            .sum();
        innovations[t] = series[t] - predicted;
    }

    let start = long_order + q;
    let design: Vec<Vec<f64>> = (start..series.len())
        .map(|t| {
            (1..=p)
                .map(|lag| series[t - lag])
                .chain((1..=q).map(|lag| innovations[t - lag]))
                .collect()
        })
        .collect();

    Ok(least_squares(&design, &series[start..])?)
}

/// One-step residuals of an ARMA recursion, zero before the first full lag
fn css_residuals(series: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let p = ar.len();
    let mut residuals = vec![0.0; series.len()];

    for t in p..series.len() {
        let mut predicted = 0.0;
        for (i, phi) in ar.iter().enumerate() {
            predicted += phi * series[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                predicted += theta * residuals[t - 1 - j];
            }
        }
        residuals[t] = series[t] - predicted;
    }

    residuals
}

fn residuals_for(series: &[f64], params: &[f64], p: usize) -> Vec<f64> {
    let (ar, ma) = params.split_at(p);
    css_residuals(series, ar, ma)
}

fn sum_of_squares(residuals: &[f64]) -> f64 {
    residuals.iter().map(|e| e * e).sum()
}

/// Minimise the conditional sum of squares with Levenberg-Marquardt steps
fn refine_css(series: &[f64], p: usize, initial: Vec<f64>) -> Result<Vec<f64>> {
    let k = initial.len();
    let mut params = initial;
    let mut residuals = residuals_for(series, &params, p);
    let mut sse = sum_of_squares(&residuals[p..]);

    if !sse.is_finite() {
        return Err(ForecastError::ModelConvergenceError(
            "Initial estimate produced non-finite residuals".to_string(),
        ));
    }

    let mut damping = 1e-3;

    for iteration in 0..MAX_ITERATIONS {
        // Forward-difference Jacobian of the residuals
        let mut jacobian = vec![vec![0.0; k]; series.len() - p];
        for col in 0..k {
            let step = 1e-6 * params[col].abs().max(1.0);
            let mut shifted = params.clone();
            shifted[col] += step;
            let shifted_residuals = residuals_for(series, &shifted, p);
            for (row, t) in (p..series.len()).enumerate() {
                jacobian[row][col] = (shifted_residuals[t] - residuals[t]) / step;
            }
        }

        let mut jtj = vec![vec![0.0; k]; k];
        let mut jtr = vec![0.0; k];
        for (row, t) in (p..series.len()).enumerate() {
            for a in 0..k {
                jtr[a] += jacobian[row][a] * residuals[t];
                for b in 0..k {
                    jtj[a][b] += jacobian[row][a] * jacobian[row][b];
                }
            }
        }

        loop {
            let mut system = jtj.clone();
            for (i, row) in system.iter_mut().enumerate() {
                row[i] += damping * jtj[i][i].max(1e-12);
            }
            let rhs: Vec<f64> = jtr.iter().map(|g| -g).collect();

            let candidate = solve_linear_system(system, rhs).ok().and_then(|delta| {
                let trial: Vec<f64> = params.iter().zip(&delta).map(|(a, b)| a + b).collect();
                let trial_residuals = residuals_for(series, &trial, p);
                let trial_sse = sum_of_squares(&trial_residuals[p..]);
                (trial_sse.is_finite() && trial_sse < sse).then_some((
                    trial,
                    trial_residuals,
                    trial_sse,
                ))
            });

            match candidate {
                Some((trial, trial_residuals, trial_sse)) => {
                    let improvement = sse - trial_sse;
                    let previous = sse;
                    params = trial;
                    residuals = trial_residuals;
                    sse = trial_sse;
                    damping = (damping / 10.0).max(1e-12);

                    if improvement <= CONVERGENCE_TOLERANCE * previous.max(f64::MIN_POSITIVE) {
                        debug!(iteration, sse, "conditional sum of squares converged");
                        return Ok(params);
                    }
                    break;
                }
                None => {
                    damping *= 10.0;
                    if damping > MAX_DAMPING {
                        debug!(iteration, sse, "no descent direction left");
                        return Ok(params);
                    }
                }
            }
        }
    }

    Err(ForecastError::ModelConvergenceError(format!(
        "Conditional sum of squares did not converge within {} iterations",
        MAX_ITERATIONS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};

    fn series_from(values: Vec<f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + Days::new(i as u64))
            .collect();
        PriceSeries::from_closes("TEST", dates, values).unwrap()
    }

    /// x_t = phi x_{t-1} + e_t + theta e_{t-1} + level
    fn arma_series(phi: f64, theta: f64, level: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut values = Vec::with_capacity(n);
        let mut previous = 0.0;
        let mut previous_shock = 0.0;
        for _ in 0..n {
            let shock: f64 = StandardNormal.sample(&mut rng);
            let value = phi * previous + shock + theta * previous_shock;
            values.push(value + level);
            previous = value;
            previous_shock = shock;
        }
        values
    }

    #[test]
    fn test_constant_series_forecasts_constant() {
        let model = ArimaModel::new(ArimaOrder::new(5, 1, 0));
        let trained = model.train(&series_from(vec![100.0; 100])).unwrap();

        let forecast = trained.forecast(5).unwrap();
        assert_eq!(forecast.horizons(), 5);
        for value in forecast.values() {
            assert_relative_eq!(*value, 100.0);
        }
        for (lower, upper) in forecast.intervals().unwrap() {
            assert_relative_eq!(*lower, *upper);
        }
    }

    #[test]
    fn test_linear_trend_continues() {
        let prices: Vec<f64> = (1..=50).map(|v| v as f64).collect();
        let trained = ArimaModel::new(ArimaOrder::new(5, 1, 0))
            .train(&series_from(prices))
            .unwrap();

        let forecast = trained.forecast(3).unwrap();
        assert_relative_eq!(forecast.values()[0], 51.0, epsilon = 1e-4);
        assert_relative_eq!(forecast.values()[2], 53.0, epsilon = 1e-4);
    }

    #[test]
    fn test_recovers_ar_coefficient() {
        let values = arma_series(0.6, 0.0, 50.0, 600, 7);
        let trained = ArimaModel::new(ArimaOrder::new(1, 0, 0))
            .train(&series_from(values))
            .unwrap();

        assert!((trained.ar_coefficients()[0] - 0.6).abs() < 0.15);
        assert!(trained.residual_variance() > 0.5 && trained.residual_variance() < 1.5);
    }

    #[test]
    fn test_mixed_order_converges() {
        let values = arma_series(0.5, 0.3, 20.0, 500, 11);
        let trained = ArimaModel::new(ArimaOrder::new(1, 0, 1))
            .train(&series_from(values))
            .unwrap();

        assert!((trained.ar_coefficients()[0] - 0.5).abs() < 0.25);
        assert!((trained.ma_coefficients()[0] - 0.3).abs() < 0.25);

        let forecast = trained.forecast(10).unwrap();
        assert_eq!(forecast.values().len(), 10);
        assert!(forecast.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_mean_reverting_forecast_approaches_level() {
        let values = arma_series(0.5, 0.0, 30.0, 400, 3);
        let trained = ArimaModel::new(ArimaOrder::new(1, 0, 0))
            .train(&series_from(values))
            .unwrap();

        let forecast = trained.forecast(60).unwrap();
        let last = forecast.values()[59];
        assert!((last - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_random_walk_intervals_widen() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut level = 100.0;
        let prices: Vec<f64> = (0..200)
            .map(|_| {
                let step: f64 = StandardNormal.sample(&mut rng);
                level += step;
                level
            })
            .collect();

        let trained = ArimaModel::new(ArimaOrder::new(5, 1, 0))
            .train(&series_from(prices))
            .unwrap();
        let forecast = trained.forecast(20).unwrap();

        let widths: Vec<f64> = forecast
            .intervals()
            .unwrap()
            .iter()
            .map(|(lower, upper)| upper - lower)
            .collect();
        assert!(widths[0] > 0.0);
        assert!(widths[19] > widths[0]);
    }

    #[test]
    fn test_predict_matches_working_length() {
        let values: Vec<f64> = (1..=30).map(|v| v as f64).collect();
        let trained = ArimaModel::new(ArimaOrder::new(1, 1, 0))
            .train(&series_from(values))
            .unwrap();

        let fitted = trained.predict();
        assert_eq!(fitted.len(), 29);
        // A unit trend differences to ones
        for value in &fitted[1..] {
            assert_relative_eq!(*value, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_explosive_fit_is_convergence_error() {
        let values: Vec<f64> = (0..40).map(|i| 1.5_f64.powi(i)).collect();
        let trained = ArimaModel::new(ArimaOrder::new(1, 0, 0))
            .train(&series_from(values))
            .unwrap();

        let result = trained.forecast(2000);
        assert!(matches!(result, Err(ForecastError::ModelConvergenceError(_))));
        // Short horizons of the same fit stay finite
        assert!(trained.forecast(5).is_ok());
    }

    #[test]
    fn test_insufficient_data() {
        let model = ArimaModel::new(ArimaOrder::new(5, 1, 0));
        let result = model.train(&series_from(vec![1.0, 2.0, 3.0]));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientDataError(_))
        ));
    }

    #[test]
    fn test_empty_series() {
        let model = ArimaModel::new(ArimaOrder::new(5, 1, 0));
        let result = model.train(&PriceSeries::empty("TEST"));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientDataError(_))
        ));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let trained = ArimaModel::new(ArimaOrder::new(1, 1, 0))
            .train(&series_from((0..30).map(|v| (v % 7) as f64).collect()))
            .unwrap();
        assert!(matches!(
            trained.forecast(0),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_confidence_level_validation() {
        let model = ArimaModel::new(ArimaOrder::new(1, 0, 0));
        assert!(model.clone().with_confidence_level(1.0).is_err());
        assert!(model.clone().with_confidence_level(0.0).is_err());
        assert!(model.with_confidence_level(0.8).is_ok());
    }

    #[test]
    fn test_psi_weights_of_random_walk() {
        let trained = ArimaModel::new(ArimaOrder::new(0, 1, 0))
            .train(&series_from(vec![1.0, 3.0, 2.0, 5.0]))
            .unwrap();

        // (1 - B)^-1 has unit weights everywhere
        assert_eq!(trained.psi_weights(4), vec![1.0, 1.0, 1.0, 1.0]);
        let forecast = trained.forecast(2).unwrap();
        assert_eq!(forecast.values(), &[5.0, 5.0]);
    }
}
