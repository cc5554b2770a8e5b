//! Daily step strategies.

use serde::Serialize;
use tracing::debug;

use super::calories::IntensityLevel;
use super::{Algorithm, AlgorithmResult, RandomSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDetails {
    /// Metres per step
    pub average_stride: f64,
    /// Rounded to two decimals
    pub distance_km: f64,
    pub intensity: IntensityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySteps {
    pub steps: i64,
    pub calories: i64,
    pub algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<StepDetails>,
}

impl AlgorithmResult for DailySteps {
    fn total_value(&self) -> i64 {
        self.steps
    }

    fn secondary_value(&self) -> i64 {
        self.calories
    }

    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

pub fn calculate<R: RandomSource + ?Sized>(algorithm: Algorithm, rng: &mut R) -> DailySteps {
    match algorithm {
        Algorithm::Simple => simple(rng),
        Algorithm::Enhanced => enhanced(rng),
        Algorithm::MlPowered => ml_powered(rng),
    }
}

fn calorie_multiplier(intensity: IntensityLevel) -> f64 {
    match intensity {
        IntensityLevel::Low => 0.035,
        IntensityLevel::Moderate => 0.045,
        IntensityLevel::High => 0.060,
        IntensityLevel::VeryHigh => 0.075,
    }
}

fn intensity_for_steps(steps: i64) -> IntensityLevel {
    match steps {
        s if s < 5_000 => IntensityLevel::Low,
        s if s < 7_500 => IntensityLevel::Moderate,
        s if s < 10_000 => IntensityLevel::High,
        _ => IntensityLevel::VeryHigh,
    }
}

fn distance_km(steps: i64, stride: f64) -> f64 {
    let km = steps as f64 * stride / 1000.0;
    (km * 100.0).round() / 100.0
}

fn simple<R: RandomSource + ?Sized>(rng: &mut R) -> DailySteps {
    debug!("using simple step algorithm");
    let steps = 5_000 + rng.next_int(0, 4_999);

    DailySteps {
        steps,
        calories: (steps as f64 * 0.04) as i64,
        algorithm: Algorithm::Simple,
        details: None,
    }
}

fn enhanced<R: RandomSource + ?Sized>(rng: &mut R) -> DailySteps {
    debug!("using enhanced step algorithm");
    let steps = 5_000 + rng.next_int(0, 4_999);
    let stride = 0.7 + rng.next_float() * 0.3;

    let intensity = if rng.next_float() < 0.5 {
        IntensityLevel::Moderate
    } else {
        IntensityLevel::High
    };

    DailySteps {
        steps,
        calories: (steps as f64 * calorie_multiplier(intensity)) as i64,
        algorithm: Algorithm::Enhanced,
        details: Some(StepDetails {
            average_stride: stride,
            distance_km: distance_km(steps, stride),
            intensity,
        }),
    }
}

// Distance is reported from the measured steps; the count and intensity use the adjusted value.
fn ml_powered<R: RandomSource + ?Sized>(rng: &mut R) -> DailySteps {
    debug!("using ml-powered step algorithm");
    let base_steps = 6_000 + rng.next_int(0, 3_999);
    let stride = 0.75 + rng.next_float() * 0.25;

    let adjustment = 1.0 + (rng.next_float() * 0.2 - 0.1);
    let steps = (base_steps as f64 * adjustment) as i64;
    let intensity = intensity_for_steps(steps);

    DailySteps {
        steps,
        calories: (steps as f64 * calorie_multiplier(intensity)) as i64,
        algorithm: Algorithm::MlPowered,
        details: Some(StepDetails {
            average_stride: stride,
            distance_km: distance_km(base_steps, stride),
            intensity,
        }),
    }
}
