use axum::{
    extract::{Query, State},
    Json,
};
use tracing::field::Empty;
use uuid::Uuid;

use crate::algorithms::calories::DailyCalories;
use crate::algorithms::RngSource;
use crate::routes::UserQuery;
use crate::state::AppState;
use super::daily_calories;

/// Today's calorie burn, computed by whichever algorithm the flag selects for this user
#[tracing::instrument(
    skip_all,
    fields(request_id = %Uuid::new_v4(), user_id = Empty, role = Empty)
)]
pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<DailyCalories> {
    let context = query.into_context();
    let mut rng = RngSource::from_entropy();

    Json(daily_calories(&state.flags, &context, &mut rng).await)
}
