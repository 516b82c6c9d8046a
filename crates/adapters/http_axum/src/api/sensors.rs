//! JSON REST handler for the sensor snapshot.

use axum::Json;
use axum::extract::State;

use pixelhub_app::ports::IntentSink;
use pixelhub_domain::sensor::SensorValue;

use crate::state::AppState;

/// `GET /api/sensors` — the latest value for every known topic.
pub async fn list<S>(State(state): State<AppState<S>>) -> Json<Vec<SensorValue>>
where
    S: IntentSink + Send + Sync + 'static,
{
    Json(state.engine.sensors().all())
}
