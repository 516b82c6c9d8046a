//! # pixelhubd — pixelhub daemon
//!
//! Composition root that wires everything together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (TOML file + env overrides)
//! - Construct the stores, template catalog, intent bus, and engine
//! - Start the evaluation scheduler
//! - Start the MQTT bridge (when enabled)
//! - Build the axum router, bind a TCP port, and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pixelhub_adapter_http_axum::state::AppState;
use pixelhub_adapter_mqtt::MqttBridge;
use pixelhub_app::engine::RuleEngine;
use pixelhub_app::intent_bus::InProcessIntentBus;
use pixelhub_app::rule_store::RuleStore;
use pixelhub_app::scheduler::Scheduler;
use pixelhub_app::sensor_store::SensorStore;
use pixelhub_domain::template::TemplateCatalog;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Shared state
    let rules = Arc::new(RuleStore::new());
    let sensors = Arc::new(SensorStore::new());
    let catalog = Arc::new(TemplateCatalog::builtin());
    let intent_bus = Arc::new(InProcessIntentBus::new(256));

    // Engine & scheduler
    let engine = Arc::new(RuleEngine::new(
        rules,
        Arc::clone(&sensors),
        catalog,
        Arc::clone(&intent_bus),
    ));
    let scheduler = Scheduler::new(Arc::clone(&engine), config.evaluation_interval());
    scheduler.start();

    // MQTT bridge
    let bridge = if config.mqtt.enabled {
        Some(MqttBridge::start(config.mqtt.bridge.clone(), sensors, intent_bus.subscribe()).await?)
    } else {
        tracing::info!("MQTT bridge disabled");
        None
    };

    // HTTP
    let state = AppState::new(engine, intent_bus);
    let app = pixelhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "pixelhubd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop();
    if let Some(bridge) = bridge {
        bridge.stop().await;
    }
    tracing::info!("pixelhubd stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
