pub mod presenter;
pub mod routes;

use serde::Serialize;
use tracing::info;

use crate::algorithms::calories::{CalorieDetails, DailyCalories};
use crate::algorithms::steps::{DailySteps, StepDetails};
use crate::algorithms::{Algorithm, RandomSource};
use crate::flags::{EvaluationContext, FlagClient, GAMIFICATION_FLAG};
use crate::routes::calories::daily_calories;
use crate::routes::steps::daily_steps;

// MODELS

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gamification {
    pub current_streak: u32,
    pub best_streak: u32,
    pub achievements: Vec<Achievement>,
}

impl Gamification {
    /// Fixed demo progress shown while gamification is switched on
    pub fn demo() -> Self {
        Self {
            current_streak: 7,
            best_streak: 14,
            achievements: vec![
                Achievement {
                    id: "first-steps",
                    title: "First Steps",
                    description: "Complete your first workout",
                    unlocked: true,
                },
                Achievement {
                    id: "week-warrior",
                    title: "Week Warrior",
                    description: "7 day streak",
                    unlocked: true,
                },
                Achievement {
                    id: "step-master",
                    title: "Step Master",
                    description: "Reach 10,000 steps",
                    unlocked: true,
                },
                Achievement {
                    id: "fitness-legend",
                    title: "Fitness Legend",
                    description: "30 day streak",
                    unlocked: false,
                },
            ],
        }
    }
}

/// Both metric results for one user, plus gamification when its flag is on
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub steps: DailySteps,
    pub calories: DailyCalories,
    pub gamification: Option<Gamification>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub steps: i64,
    pub steps_algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_details: Option<StepDetails>,
    pub calories: i64,
    pub calories_algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_details: Option<CalorieDetails>,
    pub activity_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamification: Option<Gamification>,
}

impl From<Progress> for ProgressResponse {
    fn from(progress: Progress) -> Self {
        Self {
            steps: progress.steps.steps,
            steps_algorithm: progress.steps.algorithm,
            steps_details: progress.steps.details,
            calories: progress.calories.calories,
            calories_algorithm: progress.calories.algorithm,
            calories_details: progress.calories.details,
            activity_minutes: progress.calories.activity_minutes,
            gamification: progress.gamification,
        }
    }
}

// AGGREGATION

/// Run the steps chain, the calories chain and the gamification lookup concurrently.
///
/// Each chain draws from its own random source and fills its own fields.
pub async fn daily_progress<R: RandomSource + ?Sized>(
    flags: &FlagClient,
    context: &EvaluationContext,
    steps_rng: &mut R,
    calories_rng: &mut R,
) -> Progress {
    let (steps, calories, gamification) = tokio::join!(
        daily_steps(flags, context, steps_rng),
        daily_calories(flags, context, calories_rng),
        flags.resolve(GAMIFICATION_FLAG, false, context),
    );

    info!(
        gamification = gamification.value,
        used_default = gamification.used_default,
        "gamification resolved"
    );

    Progress {
        steps,
        calories,
        gamification: gamification.value.then(Gamification::demo),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::RngSource;
    use crate::flags::testing::FailingProvider;
    use crate::flags::LocalProvider;
    use serde_json::Value;

    #[tokio::test]
    async fn test_beta_tester_progress() {
        let client = FlagClient::new(LocalProvider::builtin());
        let context = EvaluationContext::build(Some("u1"), Some("beta-tester"));
        let (mut a, mut b) = (RngSource::seeded(1), RngSource::seeded(2));

        let progress = daily_progress(&client, &context, &mut a, &mut b).await;
        assert_eq!(progress.steps.algorithm, Algorithm::Enhanced);
        assert_eq!(progress.calories.algorithm, Algorithm::Enhanced);
        assert_eq!(progress.gamification, Some(Gamification::demo()));

        let json = serde_json::to_value(ProgressResponse::from(progress.clone())).unwrap();
        assert_eq!(json["stepsAlgorithm"], "enhanced");
        assert_eq!(json["caloriesAlgorithm"], "enhanced");
        assert_eq!(json["activityMinutes"], progress.calories.activity_minutes);
        assert_eq!(json["gamification"]["currentStreak"], 7);
        assert_eq!(json["gamification"]["achievements"][3]["unlocked"], false);
        assert!(json["stepsDetails"]["distanceKm"].is_number());
        assert!(json["caloriesDetails"]["activityType"].is_string());
    }

    #[tokio::test]
    async fn test_degraded_progress() {
        let client = FlagClient::new(FailingProvider);
        let context = EvaluationContext::build(None, None);
        let (mut a, mut b) = (RngSource::seeded(1), RngSource::seeded(2));

        let progress = daily_progress(&client, &context, &mut a, &mut b).await;
        assert_eq!(progress.steps.algorithm, Algorithm::Simple);
        assert_eq!(progress.calories.algorithm, Algorithm::Simple);
        assert!(progress.gamification.is_none());

        let json = serde_json::to_value(ProgressResponse::from(progress)).unwrap();
        let object = json.as_object().unwrap();
        for absent in ["stepsDetails", "caloriesDetails", "gamification"] {
            assert!(!object.contains_key(absent), "{} should be omitted", absent);
        }
        assert!(matches!(json["steps"], Value::Number(_)));
    }

    #[test]
    fn test_demo_achievements() {
        let gamification = Gamification::demo();
        let unlocked: Vec<_> = gamification
            .achievements
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.id)
            .collect();
        assert_eq!(unlocked, ["first-steps", "week-warrior", "step-master"]);
    }
}
