use axum::{
    extract::{Query, State},
    Json,
};
use tracing::field::Empty;
use uuid::Uuid;

use crate::algorithms::steps::DailySteps;
use crate::algorithms::RngSource;
use crate::routes::UserQuery;
use crate::state::AppState;
use super::daily_steps;

#[tracing::instrument(
    skip_all,
    fields(request_id = %Uuid::new_v4(), user_id = Empty, role = Empty)
)]
pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<DailySteps> {
    let context = query.into_context();
    let mut rng = RngSource::from_entropy();

    Json(daily_steps(&state.flags, &context, &mut rng).await)
}
