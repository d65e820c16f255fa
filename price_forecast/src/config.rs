//! Dashboard defaults and model constants
//!
//! Forecasts use a fixed ARIMA order and a calendar-day index that ignores
//! trading calendars.

use std::fmt;
use std::str::FromStr;

use chrono::Days;
use serde::Serialize;

use crate::error::ForecastError;
use crate::models::ArimaOrder;

/// ARIMA order used for every forecast
pub const DEFAULT_ARIMA_ORDER: ArimaOrder = ArimaOrder::new(5, 1, 0);

/// Spacing of the forecast index: one calendar day, weekends included
pub const FORECAST_STEP: Days = Days::new(1);

/// Forecast horizon bounds offered to the user, in days
pub const DEFAULT_HORIZON_DAYS: u16 = 30;
pub const MIN_HORIZON_DAYS: u16 = 7;
pub const MAX_HORIZON_DAYS: u16 = 60;

/// Default start of the historical window
pub const DEFAULT_START_DATE: &str = "2020-01-01";

/// Random-walk dashboard shape
pub const RANDOM_WALK_START_DATE: &str = "2023-01-01";
pub const RANDOM_WALK_PERIODS: usize = 100;
pub const RANDOM_WALK_BASE_PRICE: f64 = 100.0;

/// Coverage of the prediction band drawn around the forecast
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Iteration cap for the conditional sum of squares refinement
pub const MAX_ITERATIONS: usize = 100;
/// Relative improvement in the sum of squares treated as converged
pub const CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Yahoo Finance chart endpoint
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// MIME type of the forecast download
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Instruments offered by the forecast dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Instrument {
    #[default]
    Apple,
    Microsoft,
    Alphabet,
    Amazon,
    Tesla,
    SP500,
    Nasdaq,
    DowJones,
}

impl Instrument {
    /// Every selectable instrument, in menu order
    pub const ALL: [Instrument; 8] = [
        Instrument::Apple,
        Instrument::Microsoft,
        Instrument::Alphabet,
        Instrument::Amazon,
        Instrument::Tesla,
        Instrument::SP500,
        Instrument::Nasdaq,
        Instrument::DowJones,
    ];

    /// Ticker understood by the data provider
    pub fn symbol(&self) -> &'static str {
        match self {
            Instrument::Apple => "AAPL",
            Instrument::Microsoft => "MSFT",
            Instrument::Alphabet => "GOOGL",
            Instrument::Amazon => "AMZN",
            Instrument::Tesla => "TSLA",
            Instrument::SP500 => "^GSPC",
            Instrument::Nasdaq => "^IXIC",
            Instrument::DowJones => "^DJI",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Instrument::Apple => "Apple",
            Instrument::Microsoft => "Microsoft",
            Instrument::Alphabet => "Alphabet",
            Instrument::Amazon => "Amazon",
            Instrument::Tesla => "Tesla",
            Instrument::SP500 => "S&P 500",
            Instrument::Nasdaq => "NASDAQ Composite",
            Instrument::DowJones => "Dow Jones Industrial Average",
        }
    }

    /// Short lowercase key used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Instrument::Apple => "apple",
            Instrument::Microsoft => "microsoft",
            Instrument::Alphabet => "alphabet",
            Instrument::Amazon => "amazon",
            Instrument::Tesla => "tesla",
            Instrument::SP500 => "sp500",
            Instrument::Nasdaq => "nasdaq",
            Instrument::DowJones => "dowjones",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.symbol())
    }
}

impl FromStr for Instrument {
    type Err = ForecastError;

    /// Accepts the key, the ticker or the display name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Instrument::ALL
            .iter()
            .copied()
            .find(|instrument| {
                instrument.key().eq_ignore_ascii_case(wanted)
                    || instrument.symbol().eq_ignore_ascii_case(wanted)
                    || instrument.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ForecastError::InvalidParameter(format!("Unknown instrument: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("apple", Instrument::Apple)]
    #[case("AAPL", Instrument::Apple)]
    #[case("^gspc", Instrument::SP500)]
    #[case("S&P 500", Instrument::SP500)]
    #[case(" dowjones ", Instrument::DowJones)]
    fn test_parse_instrument(#[case] input: &str, #[case] expected: Instrument) {
        assert_eq!(input.parse::<Instrument>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_instrument() {
        assert!(matches!(
            "bitcoin".parse::<Instrument>(),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_horizon_bounds_contain_default() {
        assert!((MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&DEFAULT_HORIZON_DAYS));
    }

    #[test]
    fn test_fixed_order() {
        assert_eq!(DEFAULT_ARIMA_ORDER.to_string(), "ARIMA(5,1,0)");
    }
}
