use chrono::NaiveDate;
use price_forecast::data::{parse_date, DataLoader, PricePoint, PriceSeries};
use price_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_data_loader_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,open,high,low,close,volume").unwrap();
    writeln!(file, "2023-01-03,106.0,110.0,104.0,108.0,1500").unwrap();
    writeln!(file, "2023-01-01,100.0,105.0,98.0,103.0,1000").unwrap();
    writeln!(file, "2023-01-02,103.0,107.0,101.0,,1200").unwrap();

    let series = DataLoader::from_csv(file.path(), "AAPL").unwrap();

    assert_eq!(series.symbol(), "AAPL");
    assert_eq!(series.len(), 3);
    assert_eq!(series.first_date(), Some(date(2023, 1, 1)));
    assert_eq!(series.missing_count(), 1);
    assert_eq!(series.close_prices(), vec![103.0, 108.0]);
}

#[test]
fn test_price_column_fallback() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,price").unwrap();
    writeln!(file, "01/05/2023,10.5").unwrap();
    writeln!(file, "01/06/2023,11.0").unwrap();

    let series = DataLoader::from_csv(file.path(), "X").unwrap();
    assert_eq!(series.last_date(), Some(date(2023, 1, 6)));
    assert_eq!(series.close_prices(), vec![10.5, 11.0]);
}

#[test]
fn test_missing_close_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,volume").unwrap();
    writeln!(file, "2023-01-01,100").unwrap();

    let result = DataLoader::from_csv(file.path(), "X");
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_series_rejects_unordered_dates() {
    let points = vec![
        PricePoint::new(date(2023, 1, 2), Some(1.0)),
        PricePoint::new(date(2023, 1, 2), Some(2.0)),
    ];
    assert!(matches!(
        PriceSeries::new("X", points),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_cleaning_keeps_order_and_gaps() {
    let points = vec![
        PricePoint::new(date(2023, 1, 1), Some(1.0)),
        PricePoint::new(date(2023, 1, 2), Some(f64::NAN)),
        PricePoint::new(date(2023, 1, 5), Some(3.0)),
    ];
    let series = PriceSeries::new("X", points).unwrap();
    let cleaned = series.cleaned();

    assert_eq!(cleaned.len(), 2);
    assert_eq!(cleaned.last_date(), Some(date(2023, 1, 5)));
}

#[test]
fn test_parse_date_formats() {
    assert_eq!(parse_date("2023-04-10"), Some(date(2023, 4, 10)));
    assert_eq!(parse_date("2023-04-10T16:00:00"), Some(date(2023, 4, 10)));
    assert_eq!(parse_date("04/10/2023"), Some(date(2023, 4, 10)));
    assert_eq!(parse_date("2023/04/10"), Some(date(2023, 4, 10)));
    assert_eq!(parse_date("yesterday"), None);
}
