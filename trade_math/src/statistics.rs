//! Descriptive statistics over slices

use crate::{MathError, Result};

/// Arithmetic mean
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty slice".to_string(),
        ));
    }

    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population variance
pub fn variance(data: &[f64]) -> Result<f64> {
    let m = mean(data)?;
    Ok(data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64)
}

/// Sample autocovariance at `lag`, normalised by the series length
pub fn autocovariance(data: &[f64], lag: usize) -> Result<f64> {
    if lag >= data.len() {
        return Err(MathError::InsufficientData(format!(
            "Lag {} requires more than {} values",
            lag,
            data.len()
        )));
    }

    let m = mean(data)?;
    let sum: f64 = data
        .iter()
        .zip(data.iter().skip(lag))
        .map(|(a, b)| (a - m) * (b - m))
        .sum();

    Ok(sum / data.len() as f64)
}
