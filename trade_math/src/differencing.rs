//! Differencing and integration of series
//!
//! `difference` applies the lag-1 difference operator `d` times and records
//! the last value seen at every level so that `integrate` can rebuild
//! extrapolated values back on the original scale.

use crate::{MathError, Result};

/// A series differenced `order` times
#[derive(Debug, Clone, PartialEq)]
pub struct Differenced {
    /// The differenced values
    pub values: Vec<f64>,
    /// Last value of each intermediate level, level 0 being the input series
    pub tails: Vec<f64>,
}

impl Differenced {
    /// Number of times the series was differenced
    pub fn order(&self) -> usize {
        self.tails.len()
    }
}

/// Difference `data` `order` times
pub fn difference(data: &[f64], order: usize) -> Result<Differenced> {
    if data.len() <= order {
        return Err(MathError::InsufficientData(format!(
            "Differencing of order {} needs more than {} values, have {}",
            order,
            order,
            data.len()
        )));
    }

    let mut values = data.to_vec();
    let mut tails = Vec::with_capacity(order);

    for _ in 0..order {
        // len > order guarantees a last element at every level
        tails.push(values[values.len() - 1]);
        values = values.windows(2).map(|w| w[1] - w[0]).collect();
    }

    Ok(Differenced { values, tails })
}

/// Undo differencing for values extrapolated past the end of the series
///
/// `tails` must be the tails recorded by [`difference`].
pub fn integrate(extrapolated: &[f64], tails: &[f64]) -> Vec<f64> {
    let mut values = extrapolated.to_vec();

    for &last in tails.iter().rev() {
        let mut level = last;
        for value in values.iter_mut() {
            level += *value;
            *value = level;
        }
    }

    values
}
