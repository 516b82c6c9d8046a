//! End-to-end smoke tests for the full pixelhubd stack.
//!
//! Each test spins up the complete application (real stores, real
//! engine, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot` — no TCP port is bound and no broker is
//! required.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use pixelhub_adapter_http_axum::router;
use pixelhub_adapter_http_axum::state::AppState;
use pixelhub_app::engine::RuleEngine;
use pixelhub_app::intent_bus::InProcessIntentBus;
use pixelhub_app::rule_store::RuleStore;
use pixelhub_app::sensor_store::SensorStore;
use pixelhub_domain::intent::Intent;
use pixelhub_domain::sensor::SensorValue;
use pixelhub_domain::template::TemplateCatalog;

struct App {
    state: AppState<Arc<InProcessIntentBus>>,
}

impl App {
    fn new() -> Self {
        let bus = Arc::new(InProcessIntentBus::new(256));
        let engine = Arc::new(RuleEngine::new(
            Arc::new(RuleStore::new()),
            Arc::new(SensorStore::new()),
            Arc::new(TemplateCatalog::builtin()),
            Arc::clone(&bus),
        ));
        Self {
            state: AppState::new(engine, bus),
        }
    }

    fn router(&self) -> axum::Router {
        router::build(self.state.clone())
    }

    async fn request(&self, request: Request<Body>) -> axum::response::Response {
        self.router().oneshot(request).await.unwrap()
    }

    async fn post_json(&self, uri: &str, body: serde_json::Value) -> axum::response::Response {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get(&self, uri: &str) -> axum::response::Response {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let app = App::new();
    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_fire_rule_created_over_http_when_sensor_crosses_threshold() {
    let app = App::new();
    let mut intents = app.state.intent_bus.subscribe();

    // Create a rule via the HTTP API.
    let resp = app
        .post_json(
            "/api/rules",
            serde_json::json!({
                "name": "Heat warning",
                "sensor_topic": "sensors/living/temperature",
                "sensor_name": "Living Room",
                "sensor_kind": "temperature",
                "conditions": [
                    { "type": "value", "operator": "greater_than", "value": 25.0 }
                ],
                "actions": [
                    { "type": "notification", "message": "⚠️ {sensor_name}: {sensor_value}{sensor_unit}" }
                ],
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Feed a sensor reading directly, as the MQTT bridge would.
    app.state.engine.update_sensor(
        SensorValue::new("sensors/living/temperature", "Living Room", "temperature", 26.5)
            .with_unit("°C"),
    );

    // One evaluation pass, as the scheduler would run it.
    app.state.engine.run_tick().await;

    let intent = intents.recv().await.unwrap();
    let Intent::Notification(notification) = intent else {
        panic!("expected notification intent, got {intent:?}");
    };
    assert_eq!(notification.message, "⚠️ Living Room: 26.5°C");
    assert_eq!(notification.color, "#FF0000");

    // Trigger bookkeeping is visible through the API.
    let stats = json_body(app.get("/api/stats").await).await;
    assert_eq!(stats["total_triggers"], 1);
    assert_eq!(stats["enabled_rules"], 1);
    assert!(stats["last_evaluation"].is_string());
}

#[tokio::test]
async fn should_not_fire_rule_below_threshold() {
    let app = App::new();
    let mut intents = app.state.intent_bus.subscribe();

    let resp = app
        .post_json(
            "/api/rules",
            serde_json::json!({
                "name": "Heat warning",
                "sensor_topic": "sensors/living/temperature",
                "conditions": [
                    { "type": "value", "operator": "greater_than", "value": 25.0 }
                ],
                "actions": [
                    { "type": "notification", "message": "hot" }
                ],
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    app.state.engine.update_sensor(SensorValue::new(
        "sensors/living/temperature",
        "Living Room",
        "temperature",
        24.0,
    ));
    app.state.engine.run_tick().await;

    assert!(intents.try_recv().is_err());
    let stats = json_body(app.get("/api/stats").await).await;
    assert_eq!(stats["total_triggers"], 0);
}

#[tokio::test]
async fn should_instantiate_template_and_fire_it() {
    let app = App::new();
    let mut intents = app.state.intent_bus.subscribe();

    let resp = app
        .post_json(
            "/api/templates/temperature_high/instantiate",
            serde_json::json!({
                "sensor_topic": "sensors/attic/temperature",
                "sensor_name": "Attic",
                "sensor_kind": "temperature",
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    app.state.engine.update_sensor(SensorValue::new(
        "sensors/attic/temperature",
        "Attic",
        "temperature",
        31.0,
    ));
    app.state.engine.run_tick().await;

    let intent = intents.recv().await.unwrap();
    let Intent::Notification(notification) = intent else {
        panic!("expected notification intent, got {intent:?}");
    };
    assert_eq!(notification.message, "⚠️ Temperature: 31°C");
}

#[tokio::test]
async fn should_list_created_rules_with_highest_priority_first() {
    let app = App::new();

    for (name, priority) in [("low", 1), ("high", 9)] {
        let resp = app
            .post_json(
                "/api/rules",
                serde_json::json!({ "name": name, "priority": priority }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let rules = json_body(app.get("/api/rules").await).await;
    let names: Vec<_> = rules
        .as_array()
        .unwrap()
        .iter()
        .map(|rule| rule["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["high", "low"]);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_resources() {
    let app = App::new();

    let resp = app
        .get(&format!("/api/rules/{}", pixelhub_domain::id::RuleId::new()))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .post_json(
            "/api/templates/bogus/instantiate",
            serde_json::json!({ "sensor_topic": "sensors/x" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
