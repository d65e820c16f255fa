use price_forecast::RandomWalkDashboard;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::cli::RandomWalkArgs;
use crate::error::CliError;
use crate::output;

pub fn run(args: &RandomWalkArgs) -> Result<(), CliError> {
    if args.periods == 0 {
        return Err(CliError::InvalidInput(
            "--periods must be at least 1".to_string(),
        ));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (series, chart) = RandomWalkDashboard::new(args.start, args.periods).render(&mut rng)?;
    info!(periods = series.len(), seed = ?args.seed, "random walk generated");

    let json = chart.to_json()?;
    match &args.chart_out {
        Some(path) => {
            output::write_file(path, json.as_bytes())?;
            let mut stdout = std::io::stdout().lock();
            output::write_series_summary(&mut stdout, &series)?;
        }
        None => println!("{json}"),
    }

    Ok(())
}
