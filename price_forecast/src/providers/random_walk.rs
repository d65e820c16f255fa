//! Synthetic prices for demos and tests

use super::DataProvider;
use crate::config::RANDOM_WALK_BASE_PRICE;
use crate::data::{PricePoint, PriceSeries};
use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// `periods` consecutive days of `base` plus a cumulative sum of standard
/// normal steps
pub fn random_walk<R: Rng + ?Sized>(
    symbol: &str,
    start: NaiveDate,
    periods: usize,
    base: f64,
    rng: &mut R,
) -> Result<PriceSeries> {
    if !base.is_finite() {
        return Err(ForecastError::InvalidParameter(format!(
            "Random walk base must be finite, got {}",
            base
        )));
    }

    let mut level = 0.0;
    let mut points = Vec::with_capacity(periods);
    for offset in 0..periods {
        let date = start.checked_add_days(Days::new(offset as u64)).ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "Random walk of {} days from {} overflows the calendar",
                periods, start
            ))
        })?;
        let step: f64 = rng.sample(StandardNormal);
        level += step;
        points.push(PricePoint::new(date, Some(base + level)));
    }

    PriceSeries::new(symbol, points)
}

/// Serves a random walk over whatever range is asked for
#[derive(Debug, Clone)]
pub struct RandomWalkProvider {
    seed: Option<u64>,
    base: f64,
}

impl RandomWalkProvider {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            base: RANDOM_WALK_BASE_PRICE,
        }
    }

    pub fn with_base(mut self, base: f64) -> Self {
        self.base = base;
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for RandomWalkProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DataProvider for RandomWalkProvider {
    fn name(&self) -> &str {
        "random-walk"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        if end < start {
            return Ok(PriceSeries::empty(symbol));
        }
        let periods = (end - start).num_days() as usize + 1;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        random_walk(symbol, start, periods, self.base, &mut rng)
    }
}
