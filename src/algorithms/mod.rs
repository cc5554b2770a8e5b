pub mod calories;
pub mod steps;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

/// Name of a calculation strategy, as carried by flag values and results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Simple,
    Enhanced,
    MlPowered,
}

impl Algorithm {
    /// Strategy used when a flag resolves to a name outside the known set
    pub const DEFAULT: Algorithm = Algorithm::Simple;

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Simple => "simple",
            Algorithm::Enhanced => "enhanced",
            Algorithm::MlPowered => "ml-powered",
        }
    }

    /// Map a resolved flag value onto a strategy.
    ///
    /// Matching is exact and case-sensitive. Anything unrecognised, including the
    /// empty string, selects [`Algorithm::DEFAULT`].
    pub fn dispatch(name: &str) -> Self {
        match name {
            "simple" => Algorithm::Simple,
            "enhanced" => Algorithm::Enhanced,
            "ml-powered" => Algorithm::MlPowered,
            _ => Self::DEFAULT,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the random draws a strategy consumes
pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn next_float(&mut self) -> f64;

    /// Uniform integer in `[min, max]`, both ends inclusive
    fn next_int(&mut self, min: i64, max: i64) -> i64;
}

/// [`RandomSource`] backed by any `rand` generator
pub struct RngSource<R>(R);

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_float(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        self.0.gen_range(min..=max)
    }
}

/// Uniform pick from a non-empty slice
pub(crate) fn choose<T: Copy, R: RandomSource + ?Sized>(rng: &mut R, items: &[T]) -> T {
    let idx = (rng.next_float() * items.len() as f64) as usize;
    items[idx.min(items.len() - 1)]
}

/// Fields every strategy result exposes regardless of its shape
pub trait AlgorithmResult {
    /// Headline metric (calories burned, steps walked)
    fn total_value(&self) -> i64;
    /// Supporting metric (activity minutes, calories)
    fn secondary_value(&self) -> i64;
    fn algorithm(&self) -> Algorithm;
}
