use axum::{
    extract::{Query, State},
    Json,
};
use tracing::field::Empty;
use uuid::Uuid;

use crate::algorithms::RngSource;
use crate::error::AppError;
use crate::routes::UserQuery;
use crate::state::AppState;
use super::{daily_progress, presenter, ProgressResponse};

/// Steps and calories side by side, with gamification when enabled
#[tracing::instrument(
    skip_all,
    fields(request_id = %Uuid::new_v4(), user_id = Empty, role = Empty)
)]
pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<ProgressResponse> {
    let context = query.into_context();
    let (mut steps_rng, mut calories_rng) = (RngSource::from_entropy(), RngSource::from_entropy());

    let progress = daily_progress(&state.flags, &context, &mut steps_rng, &mut calories_rng).await;
    Json(progress.into())
}

/// Text rendering of the same progress
#[tracing::instrument(
    skip_all,
    fields(request_id = %Uuid::new_v4(), user_id = Empty, role = Empty)
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<String, AppError> {
    let context = query.into_context();
    let (mut steps_rng, mut calories_rng) = (RngSource::from_entropy(), RngSource::from_entropy());

    let progress = daily_progress(&state.flags, &context, &mut steps_rng, &mut calories_rng).await;
    Ok(presenter::render_dashboard(&progress)?)
}
