use chrono::Local;
use price_forecast::providers::{CsvProvider, DataProvider, RandomWalkProvider, YahooProvider};
use price_forecast::{ForecastDashboard, ForecastRequest};
use std::time::Duration;
use tracing::info;

use crate::cli::{ForecastArgs, SourceSelector};
use crate::error::CliError;
use crate::output;

pub fn run(args: &ForecastArgs) -> Result<(), CliError> {
    let symbol = args
        .symbol
        .clone()
        .unwrap_or_else(|| args.instrument.symbol().to_string());
    let end = args.end.unwrap_or_else(|| Local::now().date_naive());

    let request = ForecastRequest::new(symbol, args.start, end, usize::from(args.horizon))?;
    let provider = build_provider(args)?;
    let report = ForecastDashboard::new(provider).handle(&request)?;

    let written = output::write_report(&args.out_dir, &report)?;
    for path in &written {
        info!(path = %path.display(), "wrote");
    }

    let mut stdout = std::io::stdout().lock();
    output::write_forecast_table(&mut stdout, &report.forecast)?;
    Ok(())
}

fn build_provider(args: &ForecastArgs) -> Result<Box<dyn DataProvider>, CliError> {
    let provider: Box<dyn DataProvider> = match args.source {
        SourceSelector::Yahoo => Box::new(YahooProvider::new(Duration::from_secs(
            args.timeout_secs,
        ))?),
        SourceSelector::Csv => {
            let path = args.csv.as_ref().ok_or_else(|| {
                CliError::InvalidInput("--source csv requires --csv <PATH>".to_string())
            })?;
            Box::new(CsvProvider::new(path))
        }
        SourceSelector::RandomWalk => Box::new(RandomWalkProvider::new(args.seed)),
    };
    Ok(provider)
}
