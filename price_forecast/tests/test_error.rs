use price_forecast::ForecastError;
use std::io;
use trade_math::MathError;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    assert!(matches!(
        ForecastError::from(io_error),
        ForecastError::IoError(_)
    ));

    let singular = MathError::SingularMatrix("pivot vanished".to_string());
    assert!(matches!(
        ForecastError::from(singular),
        ForecastError::ModelConvergenceError(_)
    ));

    let short = MathError::InsufficientData("need 3".to_string());
    assert!(matches!(
        ForecastError::from(short),
        ForecastError::InsufficientDataError(_)
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("horizon must be positive".to_string());
    assert!(error.to_string().contains("horizon must be positive"));

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}
