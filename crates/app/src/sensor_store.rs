//! Sensor value store — the latest observation per MQTT topic.
//!
//! Explicitly owned, constructor-injected state: the engine and the
//! MQTT bridge share one instance through an `Arc`, so several
//! independent engines can coexist in one process.

use std::collections::HashMap;
use std::sync::RwLock;

use pixelhub_domain::sensor::SensorValue;

/// Latest-value-per-topic map. No history is retained.
#[derive(Debug, Default)]
pub struct SensorStore {
    values: RwLock<HashMap<String, SensorValue>>,
}

impl SensorStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading, overwriting any prior value for the topic.
    pub fn update(&self, value: SensorValue) {
        tracing::debug!(topic = %value.topic, name = %value.name, value = %value.value, "sensor value updated");
        self.values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(value.topic.clone(), value);
    }

    /// Latest value for a topic. Absent is a valid "no data yet" state.
    #[must_use]
    pub fn get(&self, topic: &str) -> Option<SensorValue> {
        self.values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(topic)
            .cloned()
    }

    /// All current values, in no particular order.
    #[must_use]
    pub fn all(&self) -> Vec<SensorValue> {
        self.values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Number of topics with at least one reading.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether no sensor has reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
