//! Request kinds and their structured payloads.
//!
//! The payload is stored as JSON in the `data` column; its shape is shared
//! with the staff console, so field names are part of the contract:
//! transfer `{address, date, time, guests, comment, user_info}` and manager
//! `{message, user_info}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;
use crate::domain::user::UserSnapshot;

/// Type of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Transfer,
    Manager,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Transfer => "transfer",
            RequestKind::Manager => "manager",
        }
    }

    /// Human readable label used in staff notifications.
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Transfer => "Transfer",
            RequestKind::Manager => "Contact a manager",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transfer" => Ok(RequestKind::Transfer),
            "manager" => Ok(RequestKind::Manager),
            other => Err(ValidationError::invalid_format(
                "request_type",
                format!("unknown request type '{}'", other),
            )),
        }
    }
}

/// Finalized transfer booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    pub address: String,
    pub date: String,
    pub time: String,
    pub guests: u8,
    #[serde(default)]
    pub comment: String,
}

/// Finalized contact-a-manager message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerDetails {
    pub message: String,
}

/// Finalized draft of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDetails {
    Transfer(TransferDetails),
    Manager(ManagerDetails),
}

impl RequestDetails {
    pub fn kind(&self) -> RequestKind {
        match self {
            RequestDetails::Transfer(_) => RequestKind::Transfer,
            RequestDetails::Manager(_) => RequestKind::Manager,
        }
    }
}

/// Stored payload: the finalized draft flattened next to `user_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestPayload {
    Transfer {
        #[serde(flatten)]
        details: TransferDetails,
        user_info: UserSnapshot,
    },
    Manager {
        #[serde(flatten)]
        details: ManagerDetails,
        user_info: UserSnapshot,
    },
}

impl RequestPayload {
    pub fn new(details: RequestDetails, user_info: UserSnapshot) -> Self {
        match details {
            RequestDetails::Transfer(details) => RequestPayload::Transfer { details, user_info },
            RequestDetails::Manager(details) => RequestPayload::Manager { details, user_info },
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            RequestPayload::Transfer { .. } => RequestKind::Transfer,
            RequestPayload::Manager { .. } => RequestKind::Manager,
        }
    }

    pub fn user_info(&self) -> &UserSnapshot {
        match self {
            RequestPayload::Transfer { user_info, .. } | RequestPayload::Manager { user_info, .. } => {
                user_info
            }
        }
    }

    /// Parses a stored `data` column for a row of the given kind.
    pub fn from_json(kind: RequestKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Transfer {
            #[serde(flatten)]
            details: TransferDetails,
            user_info: UserSnapshot,
        }

        #[derive(Deserialize)]
        struct Manager {
            #[serde(flatten)]
            details: ManagerDetails,
            user_info: UserSnapshot,
        }

        // untagged deserialization cannot tell the shapes apart reliably
        // once unknown keys are allowed, so dispatch on the stored kind.
        match kind {
            RequestKind::Transfer => {
                let row: Transfer = serde_json::from_value(value)?;
                Ok(RequestPayload::Transfer {
                    details: row.details,
                    user_info: row.user_info,
                })
            }
            RequestKind::Manager => {
                let row: Manager = serde_json::from_value(value)?;
                Ok(RequestPayload::Manager {
                    details: row.details,
                    user_info: row.user_info,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> UserSnapshot {
        UserSnapshot {
            name: "Ivan Petrov".to_string(),
            phone: "+79001234567".to_string(),
            username: "@ivan".to_string(),
        }
    }

    #[test]
    fn transfer_payload_is_flat_json() {
        let payload = RequestPayload::new(
            RequestDetails::Transfer(TransferDetails {
                address: "Lenina 10".to_string(),
                date: "tomorrow".to_string(),
                time: "19:00".to_string(),
                guests: 4,
                comment: String::new(),
            }),
            snapshot(),
        );

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "address": "Lenina 10",
                "date": "tomorrow",
                "time": "19:00",
                "guests": 4,
                "comment": "",
                "user_info": {"name": "Ivan Petrov", "phone": "+79001234567", "username": "@ivan"}
            })
        );
    }

    #[test]
    fn manager_payload_is_flat_json() {
        let payload = RequestPayload::new(
            RequestDetails::Manager(ManagerDetails {
                message: "Please call me".to_string(),
            }),
            snapshot(),
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["message"], "Please call me");
        assert_eq!(value["user_info"]["username"], "@ivan");
        assert_eq!(payload.kind(), RequestKind::Manager);
    }

    #[test]
    fn from_json_uses_stored_kind() {
        let value = json!({
            "message": "Hello there",
            "user_info": {"name": "A", "phone": "B", "username": "C"}
        });
        let payload = RequestPayload::from_json(RequestKind::Manager, value.clone()).unwrap();
        assert_eq!(payload.kind(), RequestKind::Manager);
        assert!(RequestPayload::from_json(RequestKind::Transfer, value).is_err());
    }

    #[test]
    fn transfer_comment_defaults_when_missing() {
        let value = json!({
            "address": "Lenina 10",
            "date": "12.05",
            "time": "9:30",
            "guests": 2,
            "user_info": {"name": "A", "phone": "B", "username": "C"}
        });
        let payload = RequestPayload::from_json(RequestKind::Transfer, value).unwrap();
        match payload {
            RequestPayload::Transfer { details, .. } => assert_eq!(details.comment, ""),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn kind_parses_from_database_string() {
        assert_eq!("transfer".parse::<RequestKind>(), Ok(RequestKind::Transfer));
        assert!("taxi".parse::<RequestKind>().is_err());
    }
}
