//! JSON REST handlers for rules.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pixelhub_app::ports::IntentSink;
use pixelhub_app::rule_store::NewRule;
use pixelhub_domain::error::NotFoundError;
use pixelhub_domain::id::RuleId;
use pixelhub_domain::rule::{Rule, RulePatch};

use crate::error::ApiError;
use crate::state::AppState;

/// Parse a path segment as a rule id.
///
/// A malformed id can't name any rule, so it maps to the same 404 as a
/// well-formed id that matches nothing.
fn parse_id(id: &str) -> Result<RuleId, ApiError> {
    RuleId::from_str(id).map_err(|_| {
        ApiError::from(pixelhub_domain::error::PixelHubError::NotFound(not_found(
            id,
        )))
    })
}

fn not_found(id: &str) -> NotFoundError {
    NotFoundError {
        entity: "Rule",
        id: id.to_string(),
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Rule>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/rules` — list all rules, priority first.
pub async fn list<S>(State(state): State<AppState<S>>) -> Json<Vec<Rule>>
where
    S: IntentSink + Send + Sync + 'static,
{
    Json(state.engine.rules().list())
}

/// `GET /api/rules/{id}` — get rule by ID.
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Rule>, ApiError>
where
    S: IntentSink + Send + Sync + 'static,
{
    let rule_id = parse_id(&id)?;
    let rule = state
        .engine
        .rules()
        .get(rule_id)
        .ok_or_else(|| not_found(&id))
        .map_err(pixelhub_domain::error::PixelHubError::from)?;
    Ok(Json(rule))
}

/// `POST /api/rules` — create a new rule.
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<NewRule>,
) -> Result<CreateResponse, ApiError>
where
    S: IntentSink + Send + Sync + 'static,
{
    let created = state.engine.rules().create(req)?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/rules/{id}` — partially update an existing rule.
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(patch): Json<RulePatch>,
) -> Result<Json<Rule>, ApiError>
where
    S: IntentSink + Send + Sync + 'static,
{
    let rule_id = parse_id(&id)?;
    let updated = state
        .engine
        .rules()
        .update(rule_id, patch)
        .ok_or_else(|| not_found(&id))
        .map_err(pixelhub_domain::error::PixelHubError::from)?;
    Ok(Json(updated))
}

/// `DELETE /api/rules/{id}` — delete a rule.
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: IntentSink + Send + Sync + 'static,
{
    let rule_id = parse_id(&id)?;
    if !state.engine.rules().delete(rule_id) {
        return Err(ApiError::from(
            pixelhub_domain::error::PixelHubError::NotFound(not_found(&id)),
        ));
    }
    Ok(DeleteResponse::NoContent)
}
