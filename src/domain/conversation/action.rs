//! Inbound user actions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::TelegramId;

use super::labels::QuickReply;

/// A structured contact shared through the phone button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactShare {
    pub phone_number: String,
    /// Telegram user the contact belongs to, when the client reports it.
    pub owner: Option<TelegramId>,
}

impl ContactShare {
    /// True if the contact is the sender's own.
    pub fn belongs_to(&self, sender: TelegramId) -> bool {
        self.owner == Some(sender)
    }
}

/// One inbound action from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The `/start` command.
    Start,
    /// Free text or a quick-reply label.
    Text(String),
    Contact(ContactShare),
}

impl Action {
    /// Maps message text to an action; `/start` (with or without payload or
    /// bot mention) becomes `Start`.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        let command = trimmed.split_whitespace().next().unwrap_or("");
        let command = command.split('@').next().unwrap_or("");
        if command == "/start" {
            Action::Start
        } else {
            Action::Text(text.to_string())
        }
    }

    /// The quick reply this action selects, if any.
    pub fn quick_reply(&self) -> Option<QuickReply> {
        match self {
            Action::Text(text) => QuickReply::parse(text),
            _ => None,
        }
    }

    pub fn is_cancel(&self) -> bool {
        self.quick_reply() == Some(QuickReply::Cancel)
    }
}
