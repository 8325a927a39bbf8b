//! User access status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Access status of a user identity.
///
/// Stored in the database as the upper snake case name (`AGE_PENDING`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Just created by `/start`, nothing confirmed yet.
    #[default]
    New,
    /// Registration started, age not confirmed yet.
    AgePending,
    /// Registered; may use the main menu and submit requests.
    Active,
    BlockedUnderage,
    BlockedAdmin,
    Deleted,
}

impl UserStatus {
    /// Only active users may enter request intake and the main menu.
    pub fn has_access(&self) -> bool {
        matches!(self, UserStatus::Active)
    }

    /// Blocked users are refused at `/start` instead of being registered.
    pub fn is_blocked(&self) -> bool {
        matches!(self, UserStatus::BlockedUnderage | UserStatus::BlockedAdmin)
    }

    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::New => "NEW",
            UserStatus::AgePending => "AGE_PENDING",
            UserStatus::Active => "ACTIVE",
            UserStatus::BlockedUnderage => "BLOCKED_UNDERAGE",
            UserStatus::BlockedAdmin => "BLOCKED_ADMIN",
            UserStatus::Deleted => "DELETED",
        }
    }
}

impl StateMachine for UserStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use UserStatus::*;
        matches!(
            (self, target),
            (New, AgePending)
                | (New, Active)
                | (New, BlockedAdmin)
                | (New, Deleted)
                | (AgePending, Active)
                | (AgePending, BlockedUnderage)
                | (AgePending, BlockedAdmin)
                | (AgePending, Deleted)
                | (Active, BlockedAdmin)
                | (Active, Deleted)
                | (BlockedUnderage, BlockedAdmin)
                | (BlockedUnderage, Deleted)
                | (BlockedAdmin, Active)
                | (BlockedAdmin, Deleted)
                // Re-registration after account deletion
                | (Deleted, AgePending)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use UserStatus::*;
        match self {
            New => vec![AgePending, Active, BlockedAdmin, Deleted],
            AgePending => vec![Active, BlockedUnderage, BlockedAdmin, Deleted],
            Active => vec![BlockedAdmin, Deleted],
            BlockedUnderage => vec![BlockedAdmin, Deleted],
            BlockedAdmin => vec![Active, Deleted],
            Deleted => vec![AgePending],
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(UserStatus::New),
            "AGE_PENDING" => Ok(UserStatus::AgePending),
            "ACTIVE" => Ok(UserStatus::Active),
            "BLOCKED_UNDERAGE" => Ok(UserStatus::BlockedUnderage),
            "BLOCKED_ADMIN" => Ok(UserStatus::BlockedAdmin),
            "DELETED" => Ok(UserStatus::Deleted),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown user status '{}'", other),
            )),
        }
    }
}
