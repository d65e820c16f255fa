use price_forecast::ForecastError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput(_) => 2,
            Self::Forecast(error) => match error {
                ForecastError::InvalidParameter(_) => 2,
                ForecastError::DataFetchError(_)
                | ForecastError::DataError(_)
                | ForecastError::CsvError(_) => 3,
                ForecastError::InsufficientDataError(_) => 4,
                ForecastError::ModelConvergenceError(_) => 5,
                ForecastError::IoError(_) | ForecastError::JsonError(_) => 10,
            },
            Self::Io(_) => 10,
        }
    }
}
