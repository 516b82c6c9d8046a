//! Message templates — placeholder interpolation for action messages.

use crate::sensor::SensorValue;

/// Replace the supported placeholders in an action message template.
///
/// Supported placeholders: `{sensor_name}`, `{sensor_value}`,
/// `{sensor_unit}`, `{sensor_type}`, `{rule_name}`, `{timestamp}`,
/// `{trigger_count}`. Unknown placeholders are left untouched so typos
/// stay visible on the display instead of vanishing silently.
#[must_use]
pub fn render(template: &str, sensor: &SensorValue, rule_name: &str, trigger_count: u64) -> String {
    template
        .replace("{sensor_name}", &sensor.name)
        .replace("{sensor_value}", &sensor.value.to_string())
        .replace("{sensor_unit}", sensor.unit.as_deref().unwrap_or(""))
        .replace("{sensor_type}", &sensor.kind)
        .replace("{rule_name}", rule_name)
        .replace(
            "{timestamp}",
            &sensor.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
        .replace("{trigger_count}", &trigger_count.to_string())
}
