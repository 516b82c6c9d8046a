//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PixelHubError`] via `#[from]` at the boundary. Nothing in the rule
//! engine itself is allowed to abort an evaluation tick; fallible steps
//! degrade to "no match" or "no intent" and are logged by the caller.

use serde::Serialize;

/// Top-level error type crossing layer boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PixelHubError {
    /// A domain invariant was violated.
    #[error("Validation error")]
    Validation(#[from] ValidationError),

    /// A rule or template with the given identifier does not exist.
    #[error("Not found")]
    NotFound(#[from] NotFoundError),

    /// A transport-level failure (MQTT publish, channel closed, …).
    #[error("Transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A rule must have a non-empty name.
    #[error("name must not be empty")]
    EmptyName,
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[error("{entity} with id `{id}` not found")]
pub struct NotFoundError {
    /// Human-readable entity kind, e.g. `"Rule"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_validation_error() {
        let err = ValidationError::EmptyName;
        assert_eq!(err.to_string(), "name must not be empty");
    }

    #[test]
    fn should_display_not_found_error_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Rule",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Rule with id `abc` not found");
    }

    #[test]
    fn should_convert_validation_error_into_pixelhub_error() {
        let err: PixelHubError = ValidationError::EmptyName.into();
        assert!(matches!(err, PixelHubError::Validation(_)));
    }

    #[test]
    fn should_convert_not_found_error_into_pixelhub_error() {
        let err: PixelHubError = NotFoundError {
            entity: "Template",
            id: "nope".to_string(),
        }
        .into();
        assert!(matches!(err, PixelHubError::NotFound(_)));
    }
}
