//! JSON REST handlers for the rule template catalog.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use pixelhub_app::ports::IntentSink;
use pixelhub_domain::error::{NotFoundError, PixelHubError};
use pixelhub_domain::rule::Rule;
use pixelhub_domain::template::RuleTemplate;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for instantiating a template against a sensor.
#[derive(Deserialize)]
pub struct InstantiateRequest {
    pub sensor_topic: String,
    #[serde(default)]
    pub sensor_name: String,
    #[serde(default)]
    pub sensor_kind: String,
}

/// Possible responses from the instantiate endpoint.
pub enum InstantiateResponse {
    Created(Json<Rule>),
}

impl IntoResponse for InstantiateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/templates` — list the template catalog.
pub async fn list<S>(State(state): State<AppState<S>>) -> Json<Vec<RuleTemplate>>
where
    S: IntentSink + Send + Sync + 'static,
{
    Json(state.engine.catalog().list().to_vec())
}

/// `POST /api/templates/{id}/instantiate` — create a rule from a template.
pub async fn instantiate<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(req): Json<InstantiateRequest>,
) -> Result<InstantiateResponse, ApiError>
where
    S: IntentSink + Send + Sync + 'static,
{
    let rule = state
        .engine
        .instantiate_template(&id, &req.sensor_topic, &req.sensor_name, &req.sensor_kind)
        .ok_or_else(|| {
            ApiError::from(PixelHubError::NotFound(NotFoundError {
                entity: "Template",
                id: id.clone(),
            }))
        })?;
    Ok(InstantiateResponse::Created(Json(rule)))
}
