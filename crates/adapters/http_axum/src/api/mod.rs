//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod rules;
#[allow(clippy::missing_errors_doc)]
pub mod sensors;
pub mod sse;
#[allow(clippy::missing_errors_doc)]
pub mod stats;
#[allow(clippy::missing_errors_doc)]
pub mod templates;

use axum::Router;
use axum::routing::{get, post};

use pixelhub_app::ports::IntentSink;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: IntentSink + Send + Sync + 'static,
{
    Router::new()
        // Rules
        .route("/rules", get(rules::list::<S>).post(rules::create::<S>))
        .route(
            "/rules/{id}",
            get(rules::get::<S>)
                .put(rules::update::<S>)
                .delete(rules::delete::<S>),
        )
        // Templates
        .route("/templates", get(templates::list::<S>))
        .route(
            "/templates/{id}/instantiate",
            post(templates::instantiate::<S>),
        )
        // Sensors & statistics
        .route("/sensors", get(sensors::list::<S>))
        .route("/stats", get(stats::get::<S>))
        // Real-time intent stream
        .route("/intents/stream", get(sse::stream::<S>))
}
