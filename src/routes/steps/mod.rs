pub mod routes;

use tracing::info;

use crate::algorithms::steps::{self, DailySteps};
use crate::algorithms::{Algorithm, RandomSource};
use crate::flags::{EvaluationContext, FlagClient, STEP_ALGORITHM_FLAG};

pub async fn daily_steps<R: RandomSource + ?Sized>(
    flags: &FlagClient,
    context: &EvaluationContext,
    rng: &mut R,
) -> DailySteps {
    let resolution = flags
        .resolve(
            STEP_ALGORITHM_FLAG,
            Algorithm::DEFAULT.as_str().to_string(),
            context,
        )
        .await;

    let algorithm = Algorithm::dispatch(&resolution.value);
    info!(
        flag_key = STEP_ALGORITHM_FLAG,
        resolved = %resolution.value,
        used_default = resolution.used_default,
        %algorithm,
        "step algorithm selected"
    );

    steps::calculate(algorithm, rng)
}
