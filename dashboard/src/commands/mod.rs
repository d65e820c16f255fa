mod forecast;
mod instruments;
mod random_walk;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::RandomWalk(args) => random_walk::run(args),
        Command::Forecast(args) => forecast::run(args),
        Command::Instruments => instruments::run(),
    }
}
