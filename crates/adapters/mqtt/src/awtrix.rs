//! Outbound intent mapping — [`Intent`]s to AWTRIX MQTT publishes.
//!
//! AWTRIX devices expose two topics under their base prefix:
//! `{prefix}/custom/<app>` replaces the content of a custom app page,
//! `{prefix}/notify` shows a one-shot overlay. Durations on the wire
//! are seconds, not milliseconds.

use serde::Serialize;

use pixelhub_domain::intent::Intent;

/// A custom-app page update.
#[derive(Debug, Serialize)]
struct CustomAppPayload<'a> {
    text: &'a str,
    color: &'a str,
    icon: u32,
    duration: u64,
}

/// A one-shot notification overlay.
#[derive(Debug, Serialize)]
struct NotifyPayload<'a> {
    text: &'a str,
    color: &'a str,
    icon: u32,
    duration: u64,
}

/// A display effect, also delivered through the notify topic.
#[derive(Debug, Serialize)]
struct EffectPayload<'a> {
    effect: &'a str,
    color: &'a str,
    duration: u64,
}

/// Map an intent to an MQTT `(topic, payload)` pair.
///
/// Display intents address one custom app per slot (`<app><slot>`), so
/// rules targeting different slots never overwrite each other. Returns
/// `None` for intents with no MQTT representation (accessory updates
/// stay on the in-process bus).
#[must_use]
pub fn outbound(prefix: &str, app: &str, intent: &Intent) -> Option<(String, String)> {
    match intent {
        Intent::Display(display) => {
            let payload = CustomAppPayload {
                text: &display.message,
                color: &display.color,
                icon: display.icon,
                duration: display.duration_ms / 1_000,
            };
            Some((
                format!("{prefix}/custom/{app}{slot}", slot = display.slot),
                serde_json::to_string(&payload).ok()?,
            ))
        }
        Intent::Notification(notification) => {
            let payload = NotifyPayload {
                text: &notification.message,
                color: &notification.color,
                icon: notification.icon,
                duration: notification.duration_ms / 1_000,
            };
            Some((
                format!("{prefix}/notify"),
                serde_json::to_string(&payload).ok()?,
            ))
        }
        Intent::Effect(effect) => {
            let payload = EffectPayload {
                effect: &effect.effect,
                color: &effect.color,
                duration: effect.duration_ms / 1_000,
            };
            Some((
                format!("{prefix}/notify"),
                serde_json::to_string(&payload).ok()?,
            ))
        }
        Intent::Publish(publish) => Some((publish.topic.clone(), publish.message.clone())),
        Intent::AccessoryUpdate(_) => None,
    }
}
