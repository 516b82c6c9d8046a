//! Rule store — in-memory CRUD with priority-ordered listing.
//!
//! Rules live for the lifetime of the process. Listing is ordered by
//! priority descending, then by insertion order, so two rules with the
//! same priority always come back in the order they were created.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Deserialize;

use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::id::RuleId;
use pixelhub_domain::rule::{Action, Condition, Rule, RulePatch};
use pixelhub_domain::time::Timestamp;

/// Payload for creating a rule. Every field is optional; sensible
/// defaults fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRule {
    pub id: Option<RuleId>,
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sensor_topic: String,
    #[serde(default)]
    pub sensor_name: String,
    #[serde(default)]
    pub sensor_kind: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
    pub enabled: Option<bool>,
    pub priority: Option<i32>,
}

impl NewRule {
    fn into_rule(self) -> Rule {
        Rule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_else(|| "New rule".to_string()),
            description: self.description,
            sensor_topic: self.sensor_topic,
            sensor_name: self.sensor_name,
            sensor_kind: self.sensor_kind,
            conditions: self.conditions,
            actions: self.actions,
            enabled: self.enabled.unwrap_or(true),
            priority: self.priority.unwrap_or(1),
            last_triggered: None,
            trigger_count: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Rule keyed by id, paired with its insertion sequence number.
    rules: HashMap<RuleId, (u64, Rule)>,
    next_seq: u64,
}

/// In-memory rule store shared between the engine and the HTTP API.
#[derive(Debug, Default)]
pub struct RuleStore {
    inner: RwLock<Inner>,
}

impl RuleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Create a rule from a payload, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`PixelHubError::Validation`] when the resulting rule
    /// fails validation (e.g. an explicitly empty name).
    pub fn create(&self, payload: NewRule) -> Result<Rule, PixelHubError> {
        let rule = payload.into_rule();
        rule.validate()?;
        Ok(self.insert(rule))
    }

    /// Insert an already-built rule, replacing any rule with the same id.
    pub fn insert(&self, rule: Rule) -> Rule {
        tracing::info!(rule_id = %rule.id, name = %rule.name, "rule stored");
        let mut inner = self.write();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.rules.insert(rule.id, (seq, rule.clone()));
        rule
    }

    /// Apply a partial update to a rule. Returns the updated rule, or
    /// `None` when the id is unknown.
    pub fn update(&self, id: RuleId, patch: RulePatch) -> Option<Rule> {
        let mut inner = self.write();
        let (_, rule) = inner.rules.get_mut(&id)?;
        rule.apply(patch);
        tracing::info!(rule_id = %id, name = %rule.name, "rule updated");
        Some(rule.clone())
    }

    /// Remove a rule. Returns `true` when a rule was actually removed.
    pub fn delete(&self, id: RuleId) -> bool {
        let removed = self.write().rules.remove(&id).is_some();
        if removed {
            tracing::info!(rule_id = %id, "rule deleted");
        }
        removed
    }

    /// Fetch one rule by id.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<Rule> {
        self.read().rules.get(&id).map(|(_, rule)| rule.clone())
    }

    /// All rules, priority descending then insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Rule> {
        let inner = self.read();
        let mut entries: Vec<_> = inner.rules.values().cloned().collect();
        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.priority.cmp(&a.priority).then(seq_a.cmp(seq_b))
        });
        entries.into_iter().map(|(_, rule)| rule).collect()
    }

    /// Enabled rules only, same ordering as [`Self::list`].
    #[must_use]
    pub fn list_enabled(&self) -> Vec<Rule> {
        self.list().into_iter().filter(|rule| rule.enabled).collect()
    }

    /// Bump trigger bookkeeping for a rule and return the updated copy.
    ///
    /// Returns `None` when the rule no longer exists (deleted between
    /// evaluation and dispatch).
    pub fn record_trigger(&self, id: RuleId, at: Timestamp) -> Option<Rule> {
        let mut inner = self.write();
        let (_, rule) = inner.rules.get_mut(&id)?;
        rule.trigger_count += 1;
        rule.last_triggered = Some(at);
        Some(rule.clone())
    }

    /// Number of stored rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().rules.len()
    }

    /// Whether no rule is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of trigger counts across all rules.
    #[must_use]
    pub fn total_triggers(&self) -> u64 {
        self.read()
            .rules
            .values()
            .map(|(_, rule)| rule.trigger_count)
            .sum()
    }
}
