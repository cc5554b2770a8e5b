//! Daily calorie strategies.
//!
//! All three strategies draw activity minutes and turn them into calories; the richer
//! ones also pick an activity and an intensity and report them as [`CalorieDetails`].

use serde::Serialize;
use tracing::debug;

use super::{choose, Algorithm, AlgorithmResult, RandomSource};

/// Calories per minute for the simple strategy
const SIMPLE_BURN_RATE: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntensityLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl IntensityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityLevel::Low => "low",
            IntensityLevel::Moderate => "moderate",
            IntensityLevel::High => "high",
            IntensityLevel::VeryHigh => "very-high",
        }
    }

    /// Calories burned per minute before any activity multiplier
    pub fn base_burn_rate(self) -> f64 {
        match self {
            IntensityLevel::Low => 4.0,
            IntensityLevel::Moderate => 6.0,
            IntensityLevel::High => 8.0,
            IntensityLevel::VeryHigh => 10.0,
        }
    }

    fn from_activity_minutes(minutes: i64) -> Self {
        match minutes {
            m if m < 40 => IntensityLevel::Low,
            m if m < 60 => IntensityLevel::Moderate,
            m if m < 80 => IntensityLevel::High,
            _ => IntensityLevel::VeryHigh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Running,
    Cycling,
    Swimming,
    Walking,
    Yoga,
    Weights,
}

impl ActivityType {
    pub const ALL: [ActivityType; 6] = [
        ActivityType::Running,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::Walking,
        ActivityType::Yoga,
        ActivityType::Weights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "running",
            ActivityType::Cycling => "cycling",
            ActivityType::Swimming => "swimming",
            ActivityType::Walking => "walking",
            ActivityType::Yoga => "yoga",
            ActivityType::Weights => "weights",
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityType::Running => 1.3,
            ActivityType::Cycling => 1.2,
            ActivityType::Swimming => 1.4,
            ActivityType::Walking => 0.8,
            ActivityType::Yoga => 0.7,
            ActivityType::Weights => 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieDetails {
    pub intensity_level: IntensityLevel,
    pub burn_rate: f64,
    pub activity_type: ActivityType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCalories {
    pub calories: i64,
    pub activity_minutes: i64,
    pub algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CalorieDetails>,
}

impl AlgorithmResult for DailyCalories {
    fn total_value(&self) -> i64 {
        self.calories
    }

    fn secondary_value(&self) -> i64 {
        self.activity_minutes
    }

    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

/// Run the strategy named by `algorithm`
pub fn calculate<R: RandomSource + ?Sized>(algorithm: Algorithm, rng: &mut R) -> DailyCalories {
    match algorithm {
        Algorithm::Simple => simple(rng),
        Algorithm::Enhanced => enhanced(rng),
        Algorithm::MlPowered => ml_powered(rng),
    }
}

fn simple<R: RandomSource + ?Sized>(rng: &mut R) -> DailyCalories {
    debug!("using simple calorie algorithm");
    let activity_minutes = rng.next_int(30, 90);

    DailyCalories {
        calories: activity_minutes * SIMPLE_BURN_RATE,
        activity_minutes,
        algorithm: Algorithm::Simple,
        details: None,
    }
}

fn enhanced<R: RandomSource + ?Sized>(rng: &mut R) -> DailyCalories {
    debug!("using enhanced calorie algorithm");
    let activity_minutes = rng.next_int(30, 90);
    let intensity_level = if rng.next_float() > 0.5 {
        IntensityLevel::Moderate
    } else {
        IntensityLevel::High
    };
    let activity_type = choose(rng, &ActivityType::ALL);

    let burn_rate = intensity_level.base_burn_rate();
    let calories =
        (activity_minutes as f64 * burn_rate * activity_type.multiplier()).round() as i64;

    DailyCalories {
        calories,
        activity_minutes,
        algorithm: Algorithm::Enhanced,
        details: Some(CalorieDetails {
            intensity_level,
            burn_rate,
            activity_type,
        }),
    }
}

/// Personalised estimate: a +/-15% adjustment on the minutes, intensity derived from
/// the adjusted minutes, and up to half a calorie per minute of jitter on the rate.
fn ml_powered<R: RandomSource + ?Sized>(rng: &mut R) -> DailyCalories {
    debug!("using ml-powered calorie algorithm");
    let base_minutes = rng.next_int(40, 100);
    let activity_type = choose(rng, &ActivityType::ALL);

    let adjustment = 1.0 + (rng.next_float() * 0.3 - 0.15);
    let activity_minutes = (base_minutes as f64 * adjustment).round() as i64;

    let intensity_level = IntensityLevel::from_activity_minutes(activity_minutes);
    let burn_rate = intensity_level.base_burn_rate() + rng.next_float() * 0.5;
    let calories =
        (activity_minutes as f64 * burn_rate * activity_type.multiplier()).round() as i64;

    DailyCalories {
        calories,
        activity_minutes,
        algorithm: Algorithm::MlPowered,
        details: Some(CalorieDetails {
            intensity_level,
            burn_rate,
            activity_type,
        }),
    }
}
