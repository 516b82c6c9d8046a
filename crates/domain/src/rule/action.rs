//! Action — the outbound effect requested when a rule matches.

use serde::{Deserialize, Serialize};

use crate::id::ActionId;

/// The per-kind payload of an action.
///
/// Actions carry no transport knowledge; the dispatcher turns them into
/// [`Intent`](crate::intent::Intent)s for collaborators to realise.
/// Message fields may contain placeholders; see
/// [`rule::message`](crate::rule::message).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Show a message in a custom app slot on the pixel display.
    Display {
        message: String,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        icon: Option<u32>,
        #[serde(default)]
        slot: Option<u8>,
        #[serde(default)]
        duration_ms: Option<u64>,
        #[serde(default)]
        priority: Option<u8>,
    },
    /// Push a one-shot notification overlay on the display.
    Notification {
        message: String,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        icon: Option<u32>,
        #[serde(default)]
        duration_ms: Option<u64>,
        #[serde(default)]
        priority: Option<u8>,
    },
    /// Play a visual effect on the display.
    Effect {
        #[serde(default)]
        effect: Option<String>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        duration_ms: Option<u64>,
    },
    /// Publish the interpolated message to an arbitrary MQTT topic.
    Publish { topic: String, message: String },
    /// Forward the current sensor value to an accessory collaborator.
    AccessoryUpdate { accessory: String },
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Display { message, .. } => write!(f, "display({message})"),
            Self::Notification { message, .. } => write!(f, "notification({message})"),
            Self::Effect { effect, .. } => {
                write!(f, "effect({})", effect.as_deref().unwrap_or("none"))
            }
            Self::Publish { topic, .. } => write!(f, "publish({topic})"),
            Self::AccessoryUpdate { accessory } => write!(f, "accessory_update({accessory})"),
        }
    }
}

/// An action with identity, as stored inside a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub id: ActionId,
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl Action {
    /// Create an action with a fresh identifier.
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self {
            id: ActionId::new(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_action_kinds() {
        let display = ActionKind::Display {
            message: "hot".to_string(),
            color: None,
            icon: None,
            slot: None,
            duration_ms: None,
            priority: None,
        };
        assert_eq!(display.to_string(), "display(hot)");

        let effect = ActionKind::Effect {
            effect: None,
            color: None,
            duration_ms: None,
        };
        assert_eq!(effect.to_string(), "effect(none)");

        let publish = ActionKind::Publish {
            topic: "home/alerts".to_string(),
            message: "x".to_string(),
        };
        assert_eq!(publish.to_string(), "publish(home/alerts)");
    }

    #[test]
    fn should_roundtrip_actions_through_serde_json() {
        let kinds = vec![
            ActionKind::Display {
                message: "{sensor_name}: {sensor_value}".to_string(),
                color: Some("#FF0000".to_string()),
                icon: Some(1),
                slot: Some(2),
                duration_ms: Some(3000),
                priority: Some(5),
            },
            ActionKind::Notification {
                message: "alert".to_string(),
                color: None,
                icon: None,
                duration_ms: None,
                priority: None,
            },
            ActionKind::Publish {
                topic: "home/alerts".to_string(),
                message: "fired".to_string(),
            },
            ActionKind::AccessoryUpdate {
                accessory: "living-room-thermometer".to_string(),
            },
        ];
        for kind in kinds {
            let action = Action::new(kind);
            let json = serde_json::to_string(&action).unwrap();
            let parsed: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn should_deserialize_display_action_with_defaults() {
        let json = serde_json::json!({
            "type": "display",
            "message": "hello"
        });
        let action: Action = serde_json::from_value(json).unwrap();
        match action.kind {
            ActionKind::Display {
                message,
                color,
                icon,
                slot,
                duration_ms,
                priority,
            } => {
                assert_eq!(message, "hello");
                assert!(color.is_none());
                assert!(icon.is_none());
                assert!(slot.is_none());
                assert!(duration_ms.is_none());
                assert!(priority.is_none());
            }
            other => panic!("expected display action, got {other}"),
        }
    }
}
