//! # Trade Math
//!
//! Numerical building blocks for price-series modelling.
//! This crate provides the differencing, least-squares and descriptive
//! statistics routines used by the forecasting models.

use thiserror::Error;

pub mod differencing;
pub mod regression;
pub mod statistics;

pub use differencing::{difference, integrate, Differenced};
pub use regression::{least_squares, solve_linear_system};
pub use statistics::{autocovariance, mean, variance};

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Singular system: {0}")]
    SingularMatrix(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::SingularMatrix("pivot 0 is zero".to_string());
        assert_eq!(err.to_string(), "Singular system: pivot 0 is zero");
    }
}
