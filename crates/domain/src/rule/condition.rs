//! Condition — a single predicate over the rule's bound sensor value.
//!
//! All conditions of a rule must hold (logical AND); a rule with no
//! conditions matches whenever its sensor has reported a value.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::id::ConditionId;
use crate::sensor::{Reading, SensorValue};

/// Comparison operator used by `value`, `range` and `pattern` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    /// Case-insensitive substring match on the string forms.
    Contains,
    /// The right-hand side is compiled as a regular expression.
    Regex,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Contains => "contains",
            Self::Regex => "regex",
        };
        f.write_str(name)
    }
}

/// The per-kind payload of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Direct operator comparison against the sensor's raw value.
    Value { operator: Operator, value: Reading },
    /// Numeric comparison; `equals` with a threshold means "between
    /// `value` and `threshold` inclusive".
    Range {
        operator: Operator,
        value: f64,
        #[serde(default)]
        threshold: Option<f64>,
    },
    /// Delta against the previous reading. The engine keeps no value
    /// history, so this check never matches. Kept so existing rule
    /// configurations deserialize; do not invent semantics here.
    Change { operator: Operator, value: Reading },
    /// True while the local wall-clock time is inside the window.
    /// `start > end` means the window wraps past midnight.
    Time { start: String, end: String },
    /// Alias for a [`Check::Value`] comparison with the pattern as the
    /// right-hand side; defaults to the `regex` operator.
    Pattern {
        #[serde(default = "default_pattern_operator")]
        operator: Operator,
        pattern: String,
    },
}

fn default_pattern_operator() -> Operator {
    Operator::Regex
}

/// A condition with identity, as stored inside a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: ConditionId,
    #[serde(flatten)]
    pub check: Check,
}

impl Condition {
    /// Create a condition with a fresh identifier.
    #[must_use]
    pub fn new(check: Check) -> Self {
        Self {
            id: ConditionId::new(),
            check,
        }
    }

    /// Evaluate this condition against the latest sensor value.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] when the condition itself is malformed
    /// (invalid regex pattern or unparsable time window). Callers treat
    /// that as "no match" for the current tick and log it.
    pub fn matches(&self, sensor: &SensorValue, now: NaiveTime) -> Result<bool, ConditionError> {
        self.check.matches(sensor, now)
    }
}

impl Check {
    /// Evaluate the check; see [`Condition::matches`].
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] for malformed regex patterns or time
    /// windows.
    pub fn matches(&self, sensor: &SensorValue, now: NaiveTime) -> Result<bool, ConditionError> {
        match self {
            Self::Value { operator, value } => compare(&sensor.value, *operator, value),
            Self::Range {
                operator,
                value,
                threshold,
            } => Ok(range_matches(&sensor.value, *operator, *value, *threshold)),
            // No previous-value tracking: fail closed.
            Self::Change { .. } => Ok(false),
            Self::Time { start, end } => time_matches(start, end, now),
            Self::Pattern { operator, pattern } => {
                compare(&sensor.value, *operator, &Reading::Text(pattern.clone()))
            }
        }
    }
}

/// Operator dispatch shared by `value` and `pattern` checks.
fn compare(actual: &Reading, operator: Operator, expected: &Reading) -> Result<bool, ConditionError> {
    match operator {
        Operator::Equals => Ok(actual.loose_eq(expected)),
        Operator::NotEquals => Ok(!actual.loose_eq(expected)),
        Operator::GreaterThan => Ok(both_numbers(actual, expected).is_some_and(|(a, b)| a > b)),
        Operator::LessThan => Ok(both_numbers(actual, expected).is_some_and(|(a, b)| a < b)),
        Operator::Contains => Ok(actual
            .to_string()
            .to_lowercase()
            .contains(&expected.to_string().to_lowercase())),
        Operator::Regex => {
            let pattern = expected.to_string();
            let re = regex::Regex::new(&pattern).map_err(|source| ConditionError::InvalidRegex {
                pattern,
                source,
            })?;
            Ok(re.is_match(&actual.to_string()))
        }
    }
}

fn both_numbers(a: &Reading, b: &Reading) -> Option<(f64, f64)> {
    Some((a.as_number()?, b.as_number()?))
}

fn range_matches(actual: &Reading, operator: Operator, value: f64, threshold: Option<f64>) -> bool {
    let Some(number) = actual.as_number() else {
        return false;
    };
    match operator {
        Operator::GreaterThan => number > value,
        Operator::LessThan => number < value,
        Operator::Equals => number >= value && threshold.is_none_or(|max| number <= max),
        _ => false,
    }
}

fn time_matches(start: &str, end: &str, now: NaiveTime) -> Result<bool, ConditionError> {
    let start = parse_window(start)?;
    let end = parse_window(end)?;
    let current = now.hour() * 100 + now.minute();
    if start <= end {
        Ok(current >= start && current <= end)
    } else {
        // Window wraps past midnight, e.g. 22:00..06:00.
        Ok(current >= start || current <= end)
    }
}

/// Parse `HH:MM` into the `hours * 100 + minutes` encoding.
fn parse_window(text: &str) -> Result<u32, ConditionError> {
    let invalid = || ConditionError::InvalidTimeWindow(text.to_string());
    let (hours, minutes) = text.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok(hours * 100 + minutes)
}

/// A condition was malformed and could not be evaluated.
#[derive(Debug, thiserror::Error)]
pub enum ConditionError {
    /// The regex pattern failed to compile.
    #[error("invalid regex pattern `{pattern}`")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A time bound was not valid `HH:MM`.
    #[error("invalid time window bound `{0}`")]
    InvalidTimeWindow(String),
}
