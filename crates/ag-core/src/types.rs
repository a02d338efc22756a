//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The provided value was only whitespace.
    #[error("{field} cannot be whitespace-only")]
    Blank { field: &'static str },
}

/// A validated event identifier.
///
/// Event IDs key the liveness endpoint, so they must be non-empty and carry
/// at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(String);

impl EventId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "event ID" });
        }
        if id.trim().is_empty() {
            return Err(ValidationError::Blank { field: "event ID" });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_rejects_empty() {
        assert_eq!(
            EventId::new(""),
            Err(ValidationError::Empty { field: "event ID" })
        );
    }

    #[test]
    fn event_id_rejects_whitespace() {
        assert_eq!(
            EventId::new("  \t"),
            Err(ValidationError::Blank { field: "event ID" })
        );
    }

    #[test]
    fn event_id_deserializes_through_validation() {
        let id: EventId = serde_json::from_str(r#""evt-42""#).unwrap();
        assert_eq!(id.as_str(), "evt-42");

        let result: Result<EventId, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }
}
