//! Core identifier types with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated project identifier.
    ///
    /// Projects are owned by the external directory; this crate only holds
    /// references to them.
    ProjectId, "project ID"
);

define_string_id!(
    /// A validated task identifier.
    ///
    /// Tasks are scoped per project: a task ID is only meaningful together
    /// with the project it was listed under.
    TaskId, "task ID"
);

define_string_id!(
    /// A validated employee identifier.
    EmployeeId, "employee ID"
);

define_string_id!(
    /// A validated reward identifier.
    RewardId, "reward ID"
);

define_string_id!(
    /// A validated reward-assignment identifier.
    AssignmentId, "assignment ID"
);

/// A time entry identifier.
///
/// Entry IDs are assigned from a monotonic counter owned by the entry
/// store; they are never reused within a store's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Wraps a raw ID value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_id_rejects_empty() {
        assert!(ProjectId::new("").is_err());
        assert!(ProjectId::new("proj-1").is_ok());
    }

    #[test]
    fn task_id_rejects_empty() {
        assert!(TaskId::new("").is_err());
        assert!(TaskId::new("task-1").is_ok());
    }

    #[test]
    fn project_id_serde_roundtrip() {
        let id = ProjectId::new("proj-42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"proj-42\"");
        let parsed: ProjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn project_id_serde_rejects_empty() {
        let result: Result<ProjectId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn entry_id_display_and_order() {
        assert_eq!(EntryId::new(7).to_string(), "7");
        assert!(EntryId::new(2) > EntryId::new(1));
    }

    #[test]
    fn entry_id_serde_is_transparent() {
        let id = EntryId::new(12);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "12");
        let parsed: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
