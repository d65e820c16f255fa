//! Sources of historical closing prices

use crate::data::PriceSeries;
use crate::error::Result;
use chrono::NaiveDate;

pub mod csv_file;
pub mod random_walk;
pub mod yahoo;

pub use csv_file::CsvProvider;
pub use random_walk::{random_walk, RandomWalkProvider};
pub use yahoo::YahooProvider;

/// Delivers daily closes for a symbol over an inclusive date range
///
/// A provider that has nothing for the range returns an empty series
/// rather than an error; errors are reserved for transport or format
/// failures.
pub trait DataProvider {
    /// Short label used in logs
    fn name(&self) -> &str;

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

impl<P: DataProvider + ?Sized> DataProvider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        (**self).fetch(symbol, start, end)
    }
}

impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        (**self).fetch(symbol, start, end)
    }
}
