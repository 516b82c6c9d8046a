//! Rule templates — parameterized skeletons for quick rule creation.
//!
//! The catalog is fixed at process start. Instantiating a template
//! deep-copies its condition/action skeletons, assigns fresh
//! identifiers, and binds the concrete sensor.

use serde::Serialize;

use crate::rule::{Action, ActionKind, Check, Condition, Operator, Rule};
use crate::sensor::Reading;

/// A reusable skeleton for creating a [`Rule`] bound to one sensor.
#[derive(Debug, Clone, Serialize)]
pub struct RuleTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Sensor kinds this template is meant for, e.g. `["temperature"]`.
    pub sensor_kinds: Vec<String>,
    /// Condition skeletons; identifiers are assigned at instantiation.
    pub conditions: Vec<Check>,
    /// Action skeletons; identifiers are assigned at instantiation.
    pub actions: Vec<ActionKind>,
}

impl RuleTemplate {
    /// Whether this template is applicable to the given sensor kind.
    #[must_use]
    pub fn applies_to(&self, sensor_kind: &str) -> bool {
        self.sensor_kinds.iter().any(|kind| kind == sensor_kind)
    }
}

/// Static, process-wide catalog of rule templates.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<RuleTemplate>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    /// The built-in template set.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// All templates, in catalog order.
    #[must_use]
    pub fn list(&self) -> &[RuleTemplate] {
        &self.templates
    }

    /// Look up a template by its identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RuleTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Instantiate a template against a concrete sensor.
    ///
    /// Deep-copies the skeletons with fresh condition/action/rule
    /// identifiers and binds the sensor. Returns `None` for an unknown
    /// template id. The returned rule is not stored anywhere — callers
    /// hand it to the rule store.
    #[must_use]
    pub fn instantiate(
        &self,
        id: &str,
        sensor_topic: &str,
        sensor_name: &str,
        sensor_kind: &str,
    ) -> Option<Rule> {
        let template = self.get(id)?;
        let rule = Rule {
            id: crate::id::RuleId::new(),
            name: format!("{} - {sensor_name}", template.name),
            description: template.description.clone(),
            sensor_topic: sensor_topic.to_string(),
            sensor_name: sensor_name.to_string(),
            sensor_kind: sensor_kind.to_string(),
            conditions: template
                .conditions
                .iter()
                .cloned()
                .map(Condition::new)
                .collect(),
            actions: template.actions.iter().cloned().map(Action::new).collect(),
            enabled: true,
            priority: 1,
            last_triggered: None,
            trigger_count: 0,
        };
        Some(rule)
    }
}

fn builtin_templates() -> Vec<RuleTemplate> {
    vec![
        RuleTemplate {
            id: "temperature_high".to_string(),
            name: "Temperature too high".to_string(),
            description: "Warns when the temperature rises above 25°C".to_string(),
            category: "Temperature".to_string(),
            sensor_kinds: vec!["temperature".to_string()],
            conditions: vec![Check::Value {
                operator: Operator::GreaterThan,
                value: Reading::Number(25.0),
            }],
            actions: vec![ActionKind::Notification {
                message: "⚠️ Temperature: {sensor_value}°C".to_string(),
                color: Some("#FF0000".to_string()),
                icon: Some(1),
                duration_ms: None,
                priority: None,
            }],
        },
        RuleTemplate {
            id: "humidity_low".to_string(),
            name: "Humidity too low".to_string(),
            description: "Warns when the air gets too dry".to_string(),
            category: "Humidity".to_string(),
            sensor_kinds: vec!["humidity".to_string()],
            conditions: vec![Check::Value {
                operator: Operator::LessThan,
                value: Reading::Number(30.0),
            }],
            actions: vec![ActionKind::Display {
                message: "💧 Humidity: {sensor_value}%".to_string(),
                color: Some("#00BFFF".to_string()),
                icon: Some(2),
                slot: None,
                duration_ms: None,
                priority: None,
            }],
        },
        RuleTemplate {
            id: "motion_detected".to_string(),
            name: "Motion detected".to_string(),
            description: "Shows motion events on the display".to_string(),
            category: "Motion".to_string(),
            sensor_kinds: vec!["motion".to_string()],
            conditions: vec![Check::Value {
                operator: Operator::Equals,
                value: Reading::Text("motion".to_string()),
            }],
            actions: vec![ActionKind::Display {
                message: "🏃 Motion detected!".to_string(),
                color: Some("#00FF00".to_string()),
                icon: Some(3),
                slot: None,
                duration_ms: Some(3_000),
                priority: None,
            }],
        },
        RuleTemplate {
            id: "light_dark".to_string(),
            name: "Too dark".to_string(),
            description: "Warns when the light level drops".to_string(),
            category: "Light".to_string(),
            sensor_kinds: vec!["light".to_string()],
            conditions: vec![Check::Value {
                operator: Operator::LessThan,
                value: Reading::Number(100.0),
            }],
            actions: vec![ActionKind::Display {
                message: "🌙 Too dark: {sensor_value} lux".to_string(),
                color: Some("#800080".to_string()),
                icon: Some(4),
                slot: None,
                duration_ms: None,
                priority: None,
            }],
        },
        RuleTemplate {
            id: "power_high".to_string(),
            name: "High power draw".to_string(),
            description: "Warns when power consumption spikes".to_string(),
            category: "Power".to_string(),
            sensor_kinds: vec!["power".to_string(), "current".to_string()],
            conditions: vec![Check::Value {
                operator: Operator::GreaterThan,
                value: Reading::Number(1_000.0),
            }],
            actions: vec![ActionKind::Notification {
                message: "⚡ High power draw: {sensor_value}W".to_string(),
                color: Some("#FFA500".to_string()),
                icon: Some(5),
                duration_ms: None,
                priority: None,
            }],
        },
    ]
}
