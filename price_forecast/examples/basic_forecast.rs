use chrono::NaiveDate;
use price_forecast::config::DEFAULT_ARIMA_ORDER;
use price_forecast::models::arima::ArimaModel;
use price_forecast::providers::{DataProvider, RandomWalkProvider};
use price_forecast::{forecast, ForecastModel, TrainedForecastModel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Price Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Synthetic history so the example runs offline
    let provider = RandomWalkProvider::new(Some(42));
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("invalid start date")?;
    let end = NaiveDate::from_ymd_opt(2023, 6, 30).ok_or("invalid end date")?;
    let history = provider.fetch("DEMO", start, end)?;
    println!(
        "History: {} daily closes from {} to {}\n",
        history.len(),
        start,
        end
    );

    let trained = ArimaModel::new(DEFAULT_ARIMA_ORDER).train(&history)?;
    println!("Model: {}", trained.name());
    println!("AR coefficients: {:?}", trained.ar_coefficients());
    println!("Residual variance: {:.4}\n", trained.residual_variance());

    let result = forecast(&history, 10, DEFAULT_ARIMA_ORDER)?;
    println!("{:<12} {:>10} {:>10} {:>10}", "Date", "Forecast", "Lower", "Upper");
    for point in result.points() {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2}",
            point.date, point.value, point.lower, point.upper
        );
    }

    Ok(())
}
