//! Rule engine — evaluation, dispatch, and statistics.
//!
//! The engine owns no IO. Sensor values arrive through
//! [`RuleEngine::update_sensor`], evaluation runs against the stores,
//! and triggered actions leave as [`Intent`]s through the injected
//! [`IntentSink`].

use std::sync::{Arc, RwLock};

use serde::Serialize;

use pixelhub_domain::id::RuleId;
use pixelhub_domain::intent::Intent;
use pixelhub_domain::rule::{ConditionError, Rule};
use pixelhub_domain::sensor::SensorValue;
use pixelhub_domain::template::TemplateCatalog;
use pixelhub_domain::time::{self, Timestamp};

use crate::ports::IntentSink;
use crate::rule_store::RuleStore;
use crate::sensor_store::SensorStore;

/// Aggregated engine counters for the stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_rules: usize,
    pub enabled_rules: usize,
    pub total_triggers: u64,
    pub active_sensors: usize,
    pub last_evaluation: Option<Timestamp>,
}

/// Sensor rule engine.
///
/// Shared between the scheduler (ticks), the MQTT bridge (sensor
/// updates), and the HTTP API (CRUD and statistics), so everything it
/// holds is behind an `Arc` or interior mutability.
pub struct RuleEngine<S> {
    rules: Arc<RuleStore>,
    sensors: Arc<SensorStore>,
    catalog: Arc<TemplateCatalog>,
    sink: S,
    last_evaluation: RwLock<Option<Timestamp>>,
}

impl<S: IntentSink> RuleEngine<S> {
    pub fn new(
        rules: Arc<RuleStore>,
        sensors: Arc<SensorStore>,
        catalog: Arc<TemplateCatalog>,
        sink: S,
    ) -> Self {
        Self {
            rules,
            sensors,
            catalog,
            sink,
            last_evaluation: RwLock::new(None),
        }
    }

    /// The rule store backing this engine.
    #[must_use]
    pub fn rules(&self) -> &Arc<RuleStore> {
        &self.rules
    }

    /// The sensor store backing this engine.
    #[must_use]
    pub fn sensors(&self) -> &Arc<SensorStore> {
        &self.sensors
    }

    /// The template catalog backing this engine.
    #[must_use]
    pub fn catalog(&self) -> &Arc<TemplateCatalog> {
        &self.catalog
    }

    /// Record an incoming sensor value.
    pub fn update_sensor(&self, value: SensorValue) {
        self.sensors.update(value);
    }

    /// Evaluate one rule against the current sensor state.
    ///
    /// A rule whose sensor has not reported yet never matches. A rule
    /// without conditions always matches (vacuous AND).
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] when a condition itself is broken
    /// (invalid regex pattern, malformed time window).
    pub fn evaluate(&self, rule: &Rule) -> Result<bool, ConditionError> {
        let Some(sensor) = self.sensors.get(&rule.sensor_topic) else {
            return Ok(false);
        };
        let now = time::local_time_of_day();
        for condition in &rule.conditions {
            if !condition.matches(&sensor, now)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Dispatch the actions of a triggered rule.
    ///
    /// Trigger bookkeeping is bumped *before* interpolation, so the
    /// `{trigger_count}` placeholder sees the new count. A failing
    /// action is logged and skipped; the remaining actions still run.
    pub async fn dispatch(&self, rule_id: RuleId) {
        let Some(rule) = self.rules.record_trigger(rule_id, time::now()) else {
            return;
        };
        tracing::info!(rule_id = %rule.id, name = %rule.name, trigger_count = rule.trigger_count, "rule triggered");

        let sensor = self.sensors.get(&rule.sensor_topic);
        for action in &rule.actions {
            let Some(intent) = Intent::for_action(&action.kind, sensor.as_ref(), &rule) else {
                tracing::warn!(rule_id = %rule.id, action_id = %action.id, "action skipped, no sensor value");
                continue;
            };
            if let Err(error) = self.sink.deliver(intent).await {
                tracing::warn!(rule_id = %rule.id, action_id = %action.id, %error, "action dispatch failed");
            }
        }
    }

    /// One evaluation pass over all enabled rules.
    ///
    /// A broken rule (condition error) is logged and skipped; the pass
    /// always visits every enabled rule.
    pub async fn run_tick(&self) {
        *self
            .last_evaluation
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(time::now());

        for rule in self.rules.list_enabled() {
            match self.evaluate(&rule) {
                Ok(true) => self.dispatch(rule.id).await,
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(rule_id = %rule.id, name = %rule.name, %error, "rule evaluation failed");
                }
            }
        }
    }

    /// Instantiate a catalog template and store the resulting rule.
    ///
    /// Returns `None` for an unknown template id, in which case nothing
    /// is stored.
    pub fn instantiate_template(
        &self,
        template_id: &str,
        sensor_topic: &str,
        sensor_name: &str,
        sensor_kind: &str,
    ) -> Option<Rule> {
        let rule = self
            .catalog
            .instantiate(template_id, sensor_topic, sensor_name, sensor_kind)?;
        Some(self.rules.insert(rule))
    }

    /// Current engine counters.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_rules: self.rules.len(),
            enabled_rules: self.rules.list_enabled().len(),
            total_triggers: self.rules.total_triggers(),
            active_sensors: self.sensors.len(),
            last_evaluation: *self
                .last_evaluation
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        }
    }
}
