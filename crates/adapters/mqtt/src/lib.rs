//! # pixelhub-adapter-mqtt
//!
//! MQTT adapter — the bridge between the broker and the engine.
//!
//! ## Responsibilities
//! - Connect to the broker and subscribe to the configured sensor topics
//! - Parse incoming publishes into sensor values ([`ingest`])
//! - Realise outbound intents as AWTRIX publishes ([`awtrix`])
//!
//! ## Dependency rule
//! Depends on `pixelhub-app` and `pixelhub-domain`. The engine never
//! sees MQTT types; the bridge feeds the shared [`SensorStore`] and
//! drains the intent bus.

pub mod awtrix;
pub mod config;
pub mod error;
pub mod ingest;

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use pixelhub_app::sensor_store::SensorStore;
use pixelhub_domain::intent::Intent;

pub use config::MqttConfig;
pub use error::MqttError;

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Running MQTT bridge: one task polling the broker connection, one
/// task draining the intent bus.
pub struct MqttBridge {
    client: AsyncClient,
    ingest_task: JoinHandle<()>,
    publish_task: JoinHandle<()>,
}

impl MqttBridge {
    /// Connect, subscribe, and spawn the bridge tasks.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] when a subscription cannot be
    /// queued.
    pub async fn start(
        config: MqttConfig,
        sensors: Arc<SensorStore>,
        intents: broadcast::Receiver<Intent>,
    ) -> Result<Self, MqttError> {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username.clone(), password.clone());
        }

        let (client, mut eventloop) = AsyncClient::new(options, 64);
        for topic in &config.sensor_topics {
            client.subscribe(topic.clone(), QoS::AtMostOnce).await?;
        }
        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            topics = config.sensor_topics.len(),
            "MQTT bridge connected"
        );

        let ingest_task = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        match ingest::sensor_value_from_publish(&publish.topic, &publish.payload) {
                            Ok(value) => sensors.update(value),
                            Err(error) => tracing::debug!(%error, "ignored publish"),
                        }
                    }
                    Ok(_) => {}
                    Err(error) => {
                        tracing::warn!(%error, "MQTT connection error, retrying");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        });

        let publish_task = tokio::spawn(publish_loop(
            client.clone(),
            config.awtrix_prefix,
            config.awtrix_app,
            intents,
        ));

        Ok(Self {
            client,
            ingest_task,
            publish_task,
        })
    }

    /// Stop both bridge tasks and disconnect from the broker.
    pub async fn stop(self) {
        self.ingest_task.abort();
        self.publish_task.abort();
        if let Err(error) = self.client.disconnect().await {
            tracing::debug!(%error, "MQTT disconnect failed");
        }
        tracing::info!("MQTT bridge stopped");
    }
}

/// Drain the intent bus, publishing every intent with an MQTT
/// representation. A lagged receiver drops the missed intents and keeps
/// going; dispatch stays fire-and-forget.
async fn publish_loop(
    client: AsyncClient,
    prefix: String,
    app: String,
    mut intents: broadcast::Receiver<Intent>,
) {
    loop {
        match intents.recv().await {
            Ok(intent) => {
                let Some((topic, payload)) = awtrix::outbound(&prefix, &app, &intent) else {
                    continue;
                };
                tracing::debug!(%topic, "publishing intent");
                if let Err(error) = client
                    .publish(topic.as_str(), QoS::AtLeastOnce, false, payload)
                    .await
                {
                    tracing::warn!(%topic, %error, "failed to publish intent");
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "intent bus lagged, dropping missed intents");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
