//! Inbound message parsing — MQTT publishes to [`SensorValue`]s.
//!
//! Brokers deliver sensor data in several shapes: bare numbers, raw
//! text, and JSON objects in the Home Assistant style. The topic itself
//! carries the sensor's name and kind for the common layouts
//! (`sensors/<name>/<kind>`, `homeassistant/<kind>/<name>/state`).

use serde_json::Value;

use pixelhub_domain::sensor::{Reading, SensorValue};

use crate::error::MqttError;

const KNOWN_KINDS: &[&str] = &[
    "temperature",
    "humidity",
    "pressure",
    "motion",
    "light",
    "voltage",
    "current",
    "power",
];

/// Parse one MQTT publish into a sensor value.
///
/// Parsing is forgiving: an unrecognised payload becomes a text
/// reading, never a hard failure.
///
/// # Errors
///
/// Returns [`MqttError::Payload`] when no reading can be extracted:
/// the topic is too short to identify a sensor, the payload is empty
/// or not UTF-8, or a JSON payload carries no scalar reading.
pub fn sensor_value_from_publish(topic: &str, payload: &[u8]) -> Result<SensorValue, MqttError> {
    let (name, kind) = identify(topic).ok_or_else(|| unusable(topic))?;
    let text = std::str::from_utf8(payload)
        .map_err(|_| unusable(topic))?
        .trim();
    if text.is_empty() {
        return Err(unusable(topic));
    }

    let mut name = name;
    let mut kind = kind;
    let mut unit = None;
    let value = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => {
            if let Some(explicit) = object.get("name").and_then(Value::as_str) {
                name = explicit.to_string();
            }
            if let Some(explicit) = object.get("type").and_then(Value::as_str) {
                kind = explicit.to_string();
            }
            unit = object
                .get("unit")
                .or_else(|| object.get("unit_of_measurement"))
                .and_then(Value::as_str)
                .map(str::to_string);
            object
                .get("value")
                .or_else(|| object.get("state"))
                .and_then(reading_from_json)
                .ok_or_else(|| unusable(topic))?
        }
        Ok(other) => reading_from_json(&other).ok_or_else(|| unusable(topic))?,
        // Not JSON: a bare number or raw text payload.
        Err(_) => text
            .parse::<f64>()
            .map_or_else(|_| Reading::Text(text.to_string()), Reading::Number),
    };

    let mut sensor = SensorValue::new(topic, name, kind, value);
    sensor.unit = unit;
    sensor.quality = quality(&sensor);
    Ok(sensor)
}

fn unusable(topic: &str) -> MqttError {
    MqttError::Payload {
        topic: topic.to_string(),
    }
}

/// Derive (name, kind) from the topic layout.
fn identify(topic: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = topic.split('/').collect();
    let (name, kind) = match parts.as_slice() {
        ["sensors", name, kind, ..] => (*name, *kind),
        ["homeassistant", kind, name, _, ..] => (*name, *kind),
        [_, name, kind, ..] => (*name, *kind),
        [first, name] => (*name, *first),
        _ => return None,
    };
    Some((name.replace('_', " "), kind.to_string()))
}

fn reading_from_json(value: &Value) -> Option<Reading> {
    match value {
        Value::Number(n) => Some(Reading::Number(n.as_f64()?)),
        Value::String(s) => Some(Reading::Text(s.clone())),
        Value::Bool(b) => Some(Reading::Text(b.to_string())),
        _ => None,
    }
}

/// Confidence score for a parsed reading.
///
/// Readings from well-known topic layouts, with numeric values, units,
/// and recognised kinds score higher. Stateless by design: scoring a
/// reading must not require history.
fn quality(sensor: &SensorValue) -> f32 {
    let mut quality: f32 = 0.5;
    if sensor.topic.starts_with("sensors/") {
        quality += 0.2;
    }
    if sensor.topic.starts_with("homeassistant/") {
        quality += 0.3;
    }
    if sensor.topic.ends_with("/state") {
        quality += 0.1;
    }
    if matches!(sensor.value, Reading::Number(_)) {
        quality += 0.2;
    }
    if sensor.unit.is_some() {
        quality += 0.1;
    }
    if KNOWN_KINDS.contains(&sensor.kind.as_str()) {
        quality += 0.2;
    }
    quality.min(1.0)
}
