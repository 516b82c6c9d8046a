//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use pixelhub_app::ports::IntentSink;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts API routes under `/api` and a plain `/health` probe.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<S>(state: AppState<S>) -> Router
where
    S: IntentSink + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use pixelhub_app::engine::RuleEngine;
    use pixelhub_app::intent_bus::InProcessIntentBus;
    use pixelhub_app::rule_store::RuleStore;
    use pixelhub_app::sensor_store::SensorStore;
    use pixelhub_domain::rule::Rule;
    use pixelhub_domain::sensor::SensorValue;
    use pixelhub_domain::template::TemplateCatalog;

    fn test_state() -> AppState<Arc<InProcessIntentBus>> {
        let bus = Arc::new(InProcessIntentBus::new(16));
        let engine = Arc::new(RuleEngine::new(
            Arc::new(RuleStore::new()),
            Arc::new(SensorStore::new()),
            Arc::new(TemplateCatalog::builtin()),
            Arc::clone(&bus),
        ));
        AppState::new(engine, bus)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_create_and_fetch_rule() {
        let state = test_state();

        let response = build(state.clone())
            .oneshot(json_request(
                "POST",
                "/api/rules",
                serde_json::json!({
                    "name": "Heat warning",
                    "sensor_topic": "sensors/living/temperature",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = build(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/rules/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = json_body(response).await;
        assert_eq!(fetched["name"], "Heat warning");
    }

    #[tokio::test]
    async fn should_reject_rule_with_empty_name() {
        let response = build(test_state())
            .oneshot(json_request(
                "POST",
                "/api/rules",
                serde_json::json!({ "name": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_rule() {
        let response = build(test_state())
            .oneshot(
                Request::builder()
                    .uri(format!("/api/rules/{}", pixelhub_domain::id::RuleId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_not_found_for_malformed_rule_id() {
        let response = build(test_state())
            .oneshot(
                Request::builder()
                    .uri("/api/rules/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_patch_rule_fields() {
        let state = test_state();
        let rule = state
            .engine
            .rules()
            .insert(Rule::builder().name("before").build().unwrap());

        let response = build(state.clone())
            .oneshot(json_request(
                "PUT",
                &format!("/api/rules/{}", rule.id),
                serde_json::json!({ "name": "after", "enabled": false }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["name"], "after");
        assert_eq!(updated["enabled"], false);
    }

    #[tokio::test]
    async fn should_delete_rule_and_404_on_second_attempt() {
        let state = test_state();
        let rule = state
            .engine
            .rules()
            .insert(Rule::builder().name("gone").build().unwrap());
        let uri = format!("/api/rules/{}", rule.id);

        let delete =
            |uri: String| Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap();

        let response = build(state.clone()).oneshot(delete(uri.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = build(state).oneshot(delete(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_list_templates() {
        let response = build(test_state())
            .oneshot(
                Request::builder()
                    .uri("/api/templates")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let templates = json_body(response).await;
        assert_eq!(templates.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn should_instantiate_template_into_stored_rule() {
        let state = test_state();

        let response = build(state.clone())
            .oneshot(json_request(
                "POST",
                "/api/templates/temperature_high/instantiate",
                serde_json::json!({
                    "sensor_topic": "sensors/living/temperature",
                    "sensor_name": "Living Room",
                    "sensor_kind": "temperature",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let rule = json_body(response).await;
        assert_eq!(rule["name"], "Temperature too high - Living Room");
        assert_eq!(state.engine.rules().len(), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_template() {
        let response = build(test_state())
            .oneshot(json_request(
                "POST",
                "/api/templates/no_such_template/instantiate",
                serde_json::json!({ "sensor_topic": "sensors/x" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_report_sensors_and_stats() {
        let state = test_state();
        state.engine.update_sensor(
            SensorValue::new("sensors/living/temperature", "Living Room", "temperature", 22.5)
                .with_unit("°C"),
        );

        let response = build(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/api/sensors")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let sensors = json_body(response).await;
        assert_eq!(sensors.as_array().unwrap().len(), 1);

        let response = build(state)
            .oneshot(
                Request::builder()
                    .uri("/api/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let stats = json_body(response).await;
        assert_eq!(stats["active_sensors"], 1);
        assert_eq!(stats["total_rules"], 0);
        assert!(stats["last_evaluation"].is_null());
    }
}
