use axum::{routing::get, Router};
use serde::Deserialize;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::Span;

mod calories;
mod health;
mod progress;
mod steps;

pub use health::health;

use crate::error::panic_response;
use crate::flags::EvaluationContext;
use crate::state::AppState;

/// Identity query parameters shared by every metric endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
    pub role: Option<String>,
}

impl UserQuery {
    /// Build the evaluation context and tag the current request span with it
    pub fn into_context(self) -> EvaluationContext {
        let context = EvaluationContext::build(self.user_id.as_deref(), self.role.as_deref());

        let span = Span::current();
        span.record("user_id", context.targeting_key());
        span.record("role", context.role());

        context
    }
}

pub fn routes() -> Router<AppState> {
    let calories_router = Router::new()
        .route("/daily", get(calories::routes::daily))
        .route("/health", get(health));

    let steps_router = Router::new()
        .route("/daily", get(steps::routes::daily))
        .route("/health", get(health));

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/dashboard", get(progress::routes::dashboard))
        .nest(
            "/api",
            Router::new()
                .nest("/calories", calories_router)
                .nest("/steps", steps_router)
                .route("/progress/daily", get(progress::routes::daily)),
        );

    with_layers(router)
}

fn with_layers(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn root() -> &'static str {
    "FitFlag activity service: flag-selected step and calorie algorithms"
}
