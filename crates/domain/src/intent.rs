//! Intent — a data-only, kind-tagged outbound payload.
//!
//! The dispatcher never performs IO. It emits intents; collaborators
//! (the MQTT bridge, the accessory updater, the SSE stream) realise
//! them. Defaults are filled in here so every intent is complete by the
//! time it leaves the engine.

use serde::{Deserialize, Serialize};

use crate::rule::{ActionKind, Rule, message};
use crate::sensor::{Reading, SensorValue};

const DEFAULT_COLOR: &str = "#FFFFFF";
const NOTIFICATION_COLOR: &str = "#FF0000";
const DEFAULT_EFFECT: &str = "none";
const DISPLAY_DURATION_MS: u64 = 5_000;
const NOTIFICATION_DURATION_MS: u64 = 10_000;

/// A desired outbound effect, to be realised by a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Display(DisplayIntent),
    Notification(NotificationIntent),
    Effect(EffectIntent),
    Publish(PublishIntent),
    AccessoryUpdate(AccessoryUpdateIntent),
}

/// Show a message in a custom app slot on the pixel display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayIntent {
    pub message: String,
    pub color: String,
    pub icon: u32,
    pub slot: u8,
    pub duration_ms: u64,
    pub priority: u8,
}

/// One-shot notification overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub message: String,
    pub color: String,
    pub icon: u32,
    pub duration_ms: u64,
    pub priority: u8,
}

/// Visual effect on the display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectIntent {
    pub effect: String,
    pub color: String,
    pub duration_ms: u64,
}

/// Raw MQTT publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishIntent {
    pub topic: String,
    pub message: String,
}

/// Forward the current sensor value to the accessory collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryUpdateIntent {
    pub accessory: String,
    pub value: Reading,
    pub unit: Option<String>,
}

impl Intent {
    /// Build the intent for one action of a triggered rule.
    ///
    /// Message templates are interpolated against the rule's latest
    /// sensor value. Every kind except `effect` needs that value;
    /// returns `None` (action skipped, no intent) when it is absent.
    #[must_use]
    pub fn for_action(kind: &ActionKind, sensor: Option<&SensorValue>, rule: &Rule) -> Option<Self> {
        let render = |template: &str, sensor: &SensorValue| {
            message::render(template, sensor, &rule.name, rule.trigger_count)
        };

        match kind {
            ActionKind::Display {
                message,
                color,
                icon,
                slot,
                duration_ms,
                priority,
            } => {
                let sensor = sensor?;
                Some(Self::Display(DisplayIntent {
                    message: render(message, sensor),
                    color: color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                    icon: icon.unwrap_or(0),
                    slot: slot.unwrap_or(1),
                    duration_ms: duration_ms.unwrap_or(DISPLAY_DURATION_MS),
                    priority: priority.unwrap_or(1),
                }))
            }
            ActionKind::Notification {
                message,
                color,
                icon,
                duration_ms,
                priority,
            } => {
                let sensor = sensor?;
                Some(Self::Notification(NotificationIntent {
                    message: render(message, sensor),
                    color: color
                        .clone()
                        .unwrap_or_else(|| NOTIFICATION_COLOR.to_string()),
                    icon: icon.unwrap_or(0),
                    duration_ms: duration_ms.unwrap_or(NOTIFICATION_DURATION_MS),
                    priority: priority.unwrap_or(10),
                }))
            }
            ActionKind::Effect {
                effect,
                color,
                duration_ms,
            } => Some(Self::Effect(EffectIntent {
                effect: effect.clone().unwrap_or_else(|| DEFAULT_EFFECT.to_string()),
                color: color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                duration_ms: duration_ms.unwrap_or(DISPLAY_DURATION_MS),
            })),
            ActionKind::Publish { topic, message } => {
                let sensor = sensor?;
                Some(Self::Publish(PublishIntent {
                    topic: topic.clone(),
                    message: render(message, sensor),
                }))
            }
            ActionKind::AccessoryUpdate { accessory } => {
                let sensor = sensor?;
                Some(Self::AccessoryUpdate(AccessoryUpdateIntent {
                    accessory: accessory.clone(),
                    value: sensor.value.clone(),
                    unit: sensor.unit.clone(),
                }))
            }
        }
    }
}
