//! MQTT bridge configuration.

use serde::Deserialize;

/// Configuration for the MQTT bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Broker username, if the broker requires authentication.
    pub username: Option<String>,
    /// Broker password.
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Topic filters to subscribe to for sensor readings.
    pub sensor_topics: Vec<String>,
    /// Base topic of the AWTRIX device, e.g. `awtrix_b77d60`.
    pub awtrix_prefix: String,
    /// Custom-app name used for display intents.
    pub awtrix_app: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "pixelhub".to_string(),
            username: None,
            password: None,
            keep_alive_secs: 30,
            sensor_topics: vec![
                "sensors/#".to_string(),
                "homeassistant/+/+/state".to_string(),
            ],
            awtrix_prefix: "awtrix".to_string(),
            awtrix_app: "pixelhub".to_string(),
        }
    }
}
