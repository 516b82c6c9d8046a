//! Rule — sensor binding + AND-ed conditions + ordered actions.
//!
//! A rule watches one sensor topic. On every evaluation tick its
//! [`Condition`]s are tested against the latest [`SensorValue`] for that
//! topic; when all hold, each [`Action`] is dispatched as an outbound
//! intent.

mod action;
mod condition;
pub mod message;

pub use action::{Action, ActionKind};
pub use condition::{Check, Condition, ConditionError, Operator};

use serde::{Deserialize, Serialize};

use crate::error::{PixelHubError, ValidationError};
use crate::id::RuleId;
use crate::time::Timestamp;

/// A rule binding one sensor topic to conditions and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Topic of the sensor this rule watches.
    pub sensor_topic: String,
    #[serde(default)]
    pub sensor_name: String,
    #[serde(default)]
    pub sensor_kind: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
    pub enabled: bool,
    /// Listing order only — every enabled rule is evaluated each tick.
    pub priority: i32,
    #[serde(default)]
    pub last_triggered: Option<Timestamp>,
    #[serde(default)]
    pub trigger_count: u64,
}

impl Rule {
    /// Create a builder for constructing a [`Rule`].
    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PixelHubError::Validation`] when `name` is empty
    /// ([`ValidationError::EmptyName`]).
    pub fn validate(&self) -> Result<(), PixelHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Merge a partial update into this rule.
    ///
    /// Identity and trigger bookkeeping (`id`, `last_triggered`,
    /// `trigger_count`) are never touched by a patch.
    pub fn apply(&mut self, patch: RulePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(sensor_topic) = patch.sensor_topic {
            self.sensor_topic = sensor_topic;
        }
        if let Some(sensor_name) = patch.sensor_name {
            self.sensor_name = sensor_name;
        }
        if let Some(sensor_kind) = patch.sensor_kind {
            self.sensor_kind = sensor_kind;
        }
        if let Some(conditions) = patch.conditions {
            self.conditions = conditions;
        }
        if let Some(actions) = patch.actions {
            self.actions = actions;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

/// Partial-field update for an existing rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sensor_topic: Option<String>,
    pub sensor_name: Option<String>,
    pub sensor_kind: Option<String>,
    pub conditions: Option<Vec<Condition>>,
    pub actions: Option<Vec<Action>>,
    pub enabled: Option<bool>,
    pub priority: Option<i32>,
}

/// Step-by-step builder for [`Rule`].
#[derive(Debug, Default)]
pub struct RuleBuilder {
    id: Option<RuleId>,
    name: Option<String>,
    description: Option<String>,
    sensor_topic: Option<String>,
    sensor_name: Option<String>,
    sensor_kind: Option<String>,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
    enabled: Option<bool>,
    priority: Option<i32>,
}

impl RuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn sensor(
        mut self,
        topic: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        self.sensor_topic = Some(topic.into());
        self.sensor_name = Some(name.into());
        self.sensor_kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn sensor_topic(mut self, topic: impl Into<String>) -> Self {
        self.sensor_topic = Some(topic.into());
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn check(self, check: Check) -> Self {
        self.condition(Condition::new(check))
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn act(self, kind: ActionKind) -> Self {
        self.action(Action::new(kind))
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Consume the builder, validate, and return a [`Rule`].
    ///
    /// # Errors
    ///
    /// Returns [`PixelHubError::Validation`] if required fields are
    /// missing or empty.
    pub fn build(self) -> Result<Rule, PixelHubError> {
        let rule = Rule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            sensor_topic: self.sensor_topic.unwrap_or_default(),
            sensor_name: self.sensor_name.unwrap_or_default(),
            sensor_kind: self.sensor_kind.unwrap_or_default(),
            conditions: self.conditions,
            actions: self.actions,
            enabled: self.enabled.unwrap_or(true),
            priority: self.priority.unwrap_or(1),
            last_triggered: None,
            trigger_count: 0,
        };
        rule.validate()?;
        Ok(rule)
    }
}
