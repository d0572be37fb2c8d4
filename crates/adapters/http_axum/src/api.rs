//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod alarm;

use axum::Router;
use axum::routing::get;

use homeguard_app::ports::AlarmControl;

use crate::state::AppState;

/// Build the alarm routes, mounted at the root and under `/api`.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: AlarmControl + 'static,
{
    Router::new().route("/alarm", get(alarm::get::<C>).post(alarm::set::<C>))
}
