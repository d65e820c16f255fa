//! CLI argument definitions for the price dashboards.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `random-walk` | Chart a synthetic random-walk price series |
//! | `forecast` | Fetch history, forecast with ARIMA and export CSV |
//! | `instruments` | List the instruments offered by `--instrument` |
//!
//! # Examples
//!
//! ```bash
//! # 30-day Apple forecast from Yahoo Finance
//! price-dashboard forecast --instrument apple --horizon 30 --out-dir out
//!
//! # Offline forecast from a local file
//! price-dashboard forecast --source csv --csv prices.csv --symbol TEST
//!
//! # Reproducible random walk chart
//! price-dashboard random-walk --seed 7 --chart-out walk.json
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use price_forecast::config::{
    Instrument, DEFAULT_HORIZON_DAYS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_START_DATE,
    MAX_HORIZON_DAYS, MIN_HORIZON_DAYS, RANDOM_WALK_PERIODS, RANDOM_WALK_START_DATE,
};
use price_forecast::data::parse_date;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "price-dashboard",
    author,
    version,
    about = "Stock price dashboards: random walk chart and ARIMA forecast"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate and chart a random-walk price series
    RandomWalk(RandomWalkArgs),
    /// Forecast closing prices and export them as CSV
    Forecast(ForecastArgs),
    /// List the predefined instruments
    Instruments,
}

#[derive(Debug, Args)]
pub struct RandomWalkArgs {
    /// Number of daily prices
    #[arg(long, default_value_t = RANDOM_WALK_PERIODS)]
    pub periods: usize,

    /// First date of the series
    #[arg(long, value_parser = parse_date_arg, default_value = RANDOM_WALK_START_DATE)]
    pub start: NaiveDate,

    /// Seed for a reproducible series
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the chart JSON here instead of stdout
    #[arg(long)]
    pub chart_out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Predefined instrument to forecast
    #[arg(long, value_parser = parse_instrument, default_value = "apple")]
    pub instrument: Instrument,

    /// Raw ticker symbol; overrides --instrument
    #[arg(long)]
    pub symbol: Option<String>,

    /// First day of history
    #[arg(long, value_parser = parse_date_arg, default_value = DEFAULT_START_DATE)]
    pub start: NaiveDate,

    /// Last day of history, inclusive [default: today]
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Days to forecast
    #[arg(
        long,
        default_value_t = DEFAULT_HORIZON_DAYS,
        value_parser = clap::value_parser!(u16).range(MIN_HORIZON_DAYS as i64..=MAX_HORIZON_DAYS as i64)
    )]
    pub horizon: u16,

    /// Where historical prices come from
    #[arg(long, value_enum, default_value_t = SourceSelector::Yahoo)]
    pub source: SourceSelector,

    /// Price file for --source csv
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Seed for --source random-walk
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory receiving the CSV and chart files
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// HTTP timeout for --source yahoo
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    Yahoo,
    Csv,
    RandomWalk,
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{raw}' is not a date (expected YYYY-MM-DD)"))
}

fn parse_instrument(raw: &str) -> Result<Instrument, String> {
    raw.parse::<Instrument>().map_err(|error| error.to_string())
}
