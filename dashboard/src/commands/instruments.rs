use price_forecast::config::Instrument;

use crate::error::CliError;
use crate::output;

pub fn run() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    output::write_instruments(&mut stdout, &Instrument::ALL)?;
    Ok(())
}
