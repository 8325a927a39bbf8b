//! Request status state machine.
//!
//! Requests are created as `new` by the bot; only staff move them on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Processing status of a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Just submitted, nobody has picked it up.
    #[default]
    New,
    InProgress,
    /// Handled. Staff may still send follow-up replies.
    Done,
    Cancel,
}

impl RequestStatus {
    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Done => "done",
            RequestStatus::Cancel => "cancel",
        }
    }
}

impl StateMachine for RequestStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RequestStatus::*;
        matches!(
            (self, target),
            (New, InProgress)
                | (New, Done)
                | (New, Cancel)
                | (InProgress, Done)
                | (InProgress, Cancel)
                // Follow-up reply on an already handled request
                | (Done, Done)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RequestStatus::*;
        match self {
            New => vec![InProgress, Done, Cancel],
            InProgress => vec![Done, Cancel],
            Done => vec![Done],
            Cancel => vec![],
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(RequestStatus::New),
            "in_progress" => Ok(RequestStatus::InProgress),
            "done" => Ok(RequestStatus::Done),
            "cancel" => Ok(RequestStatus::Cancel),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown request status '{}'", other),
            )),
        }
    }
}
