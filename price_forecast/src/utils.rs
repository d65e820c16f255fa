//! Utility functions for the price_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};

/// Create the date index following `last_date`
///
/// Dates advance by `step` with no regard for weekends or holidays.
pub fn future_dates(last_date: NaiveDate, horizon: usize, step: Days) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last_date;

    for _ in 0..horizon {
        current = current.checked_add_days(step).ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "Forecast index overflows the calendar after {}",
                current
            ))
        })?;
        dates.push(current);
    }

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_includes_weekends() {
        // 2023-04-14 is a Friday
        let last = NaiveDate::from_ymd_opt(2023, 4, 14).unwrap();
        let dates = future_dates(last, 3, Days::new(1)).unwrap();

        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
                NaiveDate::from_ymd_opt(2023, 4, 16).unwrap(),
                NaiveDate::from_ymd_opt(2023, 4, 17).unwrap(),
            ]
        );
    }

    #[test]
    fn test_crosses_year_end() {
        let last = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let dates = future_dates(last, 1, Days::new(1)).unwrap();
        assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()]);
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        let last = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert!(future_dates(last, 0, Days::new(1)).unwrap().is_empty());
    }

    #[test]
    fn test_overflow() {
        assert!(future_dates(NaiveDate::MAX, 1, Days::new(1)).is_err());
    }
}
