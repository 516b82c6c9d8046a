//! Sensor readings — the latest observed value per MQTT topic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A sensor value is either numeric or free text.
///
/// MQTT payloads do not distinguish the two reliably, so comparisons use
/// [`loose_eq`](Self::loose_eq): a numeric string compares equal to the
/// number it denotes (`"22.5"` equals `22.5`). Two texts compare as
/// strings; a non-numeric text never equals a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    /// A numeric reading, e.g. `22.5`.
    Number(f64),
    /// A textual reading, e.g. `"motion"`.
    Text(String),
}

impl Reading {
    /// Interpret the reading as a number, parsing text if necessary.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(t) => t.trim().parse().ok(),
        }
    }

    /// Type-coercing equality.
    ///
    /// Rule configurations frequently store numbers as strings; the
    /// comparison contract must not change depending on which form a
    /// given broker delivers.
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        #[allow(clippy::float_cmp)]
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(n), Self::Text(t)) | (Self::Text(t), Self::Number(n)) => {
                t.trim().parse::<f64>().is_ok_and(|parsed| parsed == *n)
            }
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::Text(t) => t.fmt(f),
        }
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Reading {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Reading {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The latest observation for one sensor topic.
///
/// Last-write-wins per topic; no history is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorValue {
    /// MQTT topic the reading arrived on (unique key).
    pub topic: String,
    /// Human-readable sensor name.
    pub name: String,
    /// Category tag, e.g. `"temperature"`, `"humidity"`, `"custom"`.
    pub kind: String,
    /// The observed value.
    pub value: Reading,
    /// Unit of measurement, if known.
    #[serde(default)]
    pub unit: Option<String>,
    /// When the reading was observed.
    pub timestamp: Timestamp,
    /// Confidence score in `0.0..=1.0`.
    pub quality: f32,
}

impl SensorValue {
    /// Construct a reading observed now, with full confidence.
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        value: impl Into<Reading>,
    ) -> Self {
        Self {
            topic: topic.into(),
            name: name.into(),
            kind: kind.into(),
            value: value.into(),
            unit: None,
            timestamp: crate::time::now(),
            quality: 1.0,
        }
    }

    /// Attach a unit of measurement.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}
