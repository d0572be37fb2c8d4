//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use homeguard_app::ports::AlarmControl;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the API routes at the root and again under `/api`, and wraps
/// everything in a [`TraceLayer`] so each request/response is logged through
/// `tracing`.
pub fn build<C>(state: AppState<C>) -> Router
where
    C: AlarmControl + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
