//! Approval status lifecycles for time entries and reward assignments.
//!
//! These enums are the single source of truth for status strings and for
//! which transitions are legal. Time entries branch from `pending` into
//! either terminal state; reward assignments move strictly forward along
//! `pending -> approved -> claimed` with no skipping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An attempted status change that the lifecycle does not allow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid status transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

/// Error type for unknown status strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(String);

/// Approval status of a time entry.
///
/// New entries always start `Pending`. `Approved` and `Rejected` are both
/// terminal; `Rejected` is a branch from `Pending`, never reachable from
/// `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl EntryStatus {
    /// String representation for storage and display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }

    /// Validates a transition, returning the target status on success.
    pub const fn transition_to(self, to: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(TransitionError {
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }
}

/// Status of a reward assignment.
///
/// Strictly forward-only: `Pending -> Approved -> Claimed`. Skipping a
/// state (claiming a pending assignment) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RewardStatus {
    #[default]
    Pending,
    Approved,
    Claimed,
}

impl RewardStatus {
    /// String representation for storage and display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Claimed => "claimed",
        }
    }

    /// The next state along the chain, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Approved),
            Self::Approved => Some(Self::Claimed),
            Self::Claimed => None,
        }
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved) | (Self::Approved, Self::Claimed)
        )
    }

    /// Validates a transition, returning the target status on success.
    pub const fn transition_to(self, to: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(TransitionError {
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }
}

macro_rules! status_string_impls {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    _ => Err(UnknownStatus(s.to_string())),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

status_string_impls!(EntryStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

status_string_impls!(RewardStatus {
    Pending => "pending",
    Approved => "approved",
    Claimed => "claimed",
});
