//! Conversation sessions: where a chat is in a flow, plus its draft.
//!
//! Draft fields are `Option`s that are only ever filled with validated
//! values, so a draft never holds a field the user has not passed yet.

use serde::{Deserialize, Serialize};

use crate::domain::request::{ManagerDetails, TransferDetails};

/// Editable transfer fields, in entry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferField {
    Address,
    Date,
    Time,
    Guests,
    Comment,
}

impl TransferField {
    pub const ORDER: [TransferField; 5] = [
        TransferField::Address,
        TransferField::Date,
        TransferField::Time,
        TransferField::Guests,
        TransferField::Comment,
    ];

    /// Field that follows this one during first entry.
    pub fn next(&self) -> Option<TransferField> {
        match self {
            TransferField::Address => Some(TransferField::Date),
            TransferField::Date => Some(TransferField::Time),
            TransferField::Time => Some(TransferField::Guests),
            TransferField::Guests => Some(TransferField::Comment),
            TransferField::Comment => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferField::Address => "address",
            TransferField::Date => "date",
            TransferField::Time => "time",
            TransferField::Guests => "guests",
            TransferField::Comment => "comment",
        }
    }
}

/// Transfer fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TransferDraft {
    /// First required field still missing, if any.
    pub fn first_missing(&self) -> Option<TransferField> {
        if self.address.is_none() {
            Some(TransferField::Address)
        } else if self.date.is_none() {
            Some(TransferField::Date)
        } else if self.time.is_none() {
            Some(TransferField::Time)
        } else if self.guests.is_none() {
            Some(TransferField::Guests)
        } else {
            None
        }
    }

    /// Finalized details, once every required field is present.
    pub fn finalize(&self) -> Option<TransferDetails> {
        Some(TransferDetails {
            address: self.address.clone()?,
            date: self.date.clone()?,
            time: self.time.clone()?,
            guests: self.guests?,
            comment: self.comment.clone().unwrap_or_default(),
        })
    }
}

/// Manager message collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ManagerDraft {
    pub fn finalize(&self) -> Option<ManagerDetails> {
        Some(ManagerDetails {
            message: self.message.clone()?,
        })
    }
}

/// Position in the transfer flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStep {
    /// First pass through the fields.
    Entering(TransferField),
    /// Re-entering one field from the edit menu; returns to confirm.
    Revising(TransferField),
    Confirm,
    Edit,
}

/// Position in the manager flow. Editing re-enters `Message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerStep {
    Message,
    Confirm,
}

/// Position in the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    AgeConfirm,
    Consent,
    Phone,
}

/// The ephemeral per-chat flow record. Absent session means idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum ConversationSession {
    Registration {
        step: RegistrationStep,
    },
    Transfer {
        step: TransferStep,
        #[serde(default)]
        draft: TransferDraft,
    },
    Manager {
        step: ManagerStep,
        #[serde(default)]
        draft: ManagerDraft,
    },
}

impl ConversationSession {
    /// Short step name for logs, e.g. `transfer.entering.date`.
    pub fn step_name(&self) -> String {
        match self {
            ConversationSession::Registration { step } => match step {
                RegistrationStep::AgeConfirm => "registration.age_confirm".to_string(),
                RegistrationStep::Consent => "registration.consent".to_string(),
                RegistrationStep::Phone => "registration.phone".to_string(),
            },
            ConversationSession::Transfer { step, .. } => match step {
                TransferStep::Entering(field) => format!("transfer.entering.{}", field.as_str()),
                TransferStep::Revising(field) => format!("transfer.revising.{}", field.as_str()),
                TransferStep::Confirm => "transfer.confirm".to_string(),
                TransferStep::Edit => "transfer.edit".to_string(),
            },
            ConversationSession::Manager { step, .. } => match step {
                ManagerStep::Message => "manager.message".to_string(),
                ManagerStep::Confirm => "manager.confirm".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> TransferDraft {
        TransferDraft {
            address: Some("Lenina 10".to_string()),
            date: Some("tomorrow".to_string()),
            time: Some("19:00".to_string()),
            guests: Some(4),
            comment: None,
        }
    }

    #[test]
    fn fields_follow_entry_order() {
        let mut field = TransferField::Address;
        let mut seen = vec![field];
        while let Some(next) = field.next() {
            seen.push(next);
            field = next;
        }
        assert_eq!(seen, TransferField::ORDER.to_vec());
    }

    #[test]
    fn finalize_requires_all_required_fields() {
        let mut draft = full_draft();
        assert!(draft.finalize().is_some());
        draft.time = None;
        assert!(draft.finalize().is_none());
        assert_eq!(draft.first_missing(), Some(TransferField::Time));
    }

    #[test]
    fn missing_comment_finalizes_as_empty() {
        let details = full_draft().finalize().unwrap();
        assert_eq!(details.comment, "");
        assert_eq!(details.guests, 4);
    }

    #[test]
    fn empty_draft_serializes_without_keys() {
        let json = serde_json::to_value(TransferDraft::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn session_survives_json_round_trip() {
        let session = ConversationSession::Transfer {
            step: TransferStep::Revising(TransferField::Guests),
            draft: full_draft(),
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: ConversationSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn step_name_is_dotted() {
        let session = ConversationSession::Transfer {
            step: TransferStep::Entering(TransferField::Date),
            draft: TransferDraft::default(),
        };
        assert_eq!(session.step_name(), "transfer.entering.date");
    }
}
