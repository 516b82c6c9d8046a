//! JSON REST handler for engine statistics.

use axum::Json;
use axum::extract::State;

use pixelhub_app::engine::Statistics;
use pixelhub_app::ports::IntentSink;

use crate::state::AppState;

/// `GET /api/stats` — rule and sensor counters plus the last
/// evaluation timestamp.
pub async fn get<S>(State(state): State<AppState<S>>) -> Json<Statistics>
where
    S: IntentSink + Send + Sync + 'static,
{
    Json(state.engine.statistics())
}
