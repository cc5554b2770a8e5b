pub mod routes;

use tracing::info;

use crate::algorithms::calories::{self, DailyCalories};
use crate::algorithms::{Algorithm, RandomSource};
use crate::flags::{EvaluationContext, FlagClient, CALORIE_ALGORITHM_FLAG};

/// Resolve the calorie algorithm flag for `context` and run the selected strategy
pub async fn daily_calories<R: RandomSource + ?Sized>(
    flags: &FlagClient,
    context: &EvaluationContext,
    rng: &mut R,
) -> DailyCalories {
    let resolution = flags
        .resolve(
            CALORIE_ALGORITHM_FLAG,
            Algorithm::DEFAULT.as_str().to_string(),
            context,
        )
        .await;

    let algorithm = Algorithm::dispatch(&resolution.value);
    info!(
        flag_key = CALORIE_ALGORITHM_FLAG,
        resolved = %resolution.value,
        used_default = resolution.used_default,
        %algorithm,
        "calorie algorithm selected"
    );

    calories::calculate(algorithm, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::calories::ActivityType;
    use crate::algorithms::{AlgorithmResult, RngSource};
    use crate::flags::testing::{FailingProvider, FixedProvider};
    use crate::flags::{FlagValue, LocalProvider};

    fn fixed(name: &str) -> FlagClient {
        FlagClient::new(FixedProvider(FlagValue::String(name.to_string())))
    }

    #[tokio::test]
    async fn test_result_carries_dispatched_algorithm() {
        let context = EvaluationContext::build(Some("u1"), None);

        for (name, expected) in [
            ("simple", Algorithm::Simple),
            ("enhanced", Algorithm::Enhanced),
            ("ml-powered", Algorithm::MlPowered),
            ("Enhanced", Algorithm::Simple),
            ("quantum", Algorithm::Simple),
            ("", Algorithm::Simple),
        ] {
            let mut rng = RngSource::seeded(3);
            let result = daily_calories(&fixed(name), &context, &mut rng).await;
            assert_eq!(result.algorithm(), expected, "flag value {:?}", name);
            assert_eq!(result.details.is_some(), expected != Algorithm::Simple);
        }
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_simple() {
        let client = FlagClient::new(FailingProvider);
        let context = EvaluationContext::build(None, None);
        let mut rng = RngSource::seeded(11);

        let result = daily_calories(&client, &context, &mut rng).await;
        assert_eq!(result.algorithm, Algorithm::Simple);
        assert!(result.details.is_none());
        assert!((30..=90).contains(&result.activity_minutes));
        assert_eq!(result.calories, result.activity_minutes * 5);
    }

    #[tokio::test]
    async fn test_builtin_flags_follow_role() {
        let client = FlagClient::new(LocalProvider::builtin());
        let mut rng = RngSource::seeded(5);

        let beta = EvaluationContext::build(Some("u1"), Some("beta-tester"));
        let result = daily_calories(&client, &beta, &mut rng).await;
        assert_eq!(result.algorithm, Algorithm::Enhanced);
        let details = result.details.unwrap();
        assert!(ActivityType::ALL.contains(&details.activity_type));

        let regular = EvaluationContext::build(Some("u1"), Some("user"));
        let result = daily_calories(&client, &regular, &mut rng).await;
        assert_eq!(result.algorithm, Algorithm::Simple);
    }
}
