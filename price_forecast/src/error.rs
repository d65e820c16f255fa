//! Error types for the price_forecast crate

use thiserror::Error;
use trade_math::MathError;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The data provider could not deliver prices
    #[error("Data fetch error: {0}")]
    DataFetchError(String),

    /// Too few clean observations for the requested model order
    #[error("Insufficient data: {0}")]
    InsufficientDataError(String),

    /// Estimation failed to converge or hit a singular system
    #[error("Model convergence error: {0}")]
    ModelConvergenceError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON encoding or decoding
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientDataError(msg),
            MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            MathError::CalculationError(msg) | MathError::SingularMatrix(msg) => {
                ForecastError::ModelConvergenceError(msg)
            }
        }
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        ForecastError::DataFetchError(err.to_string())
    }
}
