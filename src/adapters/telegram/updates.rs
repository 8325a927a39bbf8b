//! Bot API update DTOs and their mapping to inbound actions.
//!
//! Only the fields the bot reads are modelled; serde ignores the rest.

use serde::Deserialize;

use crate::application::handlers::chat::InboundUpdate;
use crate::domain::conversation::{Action, ContactShare};
use crate::domain::foundation::TelegramId;
use crate::domain::user::SenderProfile;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    /// Present when the contact is a Telegram user.
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl From<&User> for SenderProfile {
    fn from(user: &User) -> Self {
        Self {
            telegram_id: TelegramId::new(user.id),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            language_code: user.language_code.clone(),
        }
    }
}

impl Update {
    /// Maps the update to an inbound action.
    ///
    /// Returns `None` for anything the bot does not handle: non-message
    /// updates, messages without a human sender, and messages that carry
    /// neither text nor a contact.
    pub fn into_inbound(self) -> Option<InboundUpdate> {
        let message = self.message?;
        let from = message.from.as_ref().filter(|user| !user.is_bot)?;

        let action = if let Some(contact) = message.contact {
            Action::Contact(ContactShare {
                phone_number: contact.phone_number,
                owner: contact.user_id.map(TelegramId::new),
            })
        } else {
            Action::from_text(message.text.as_deref()?)
        };

        Some(InboundUpdate {
            sender: SenderProfile::from(from),
            chat: TelegramId::new(message.chat.id),
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_message_becomes_text_action() {
        let update = parse(
            r#"{
                "update_id": 1,
                "message": {
                    "message_id": 10,
                    "date": 1700000000,
                    "chat": {"id": 1001, "type": "private"},
                    "from": {"id": 1001, "is_bot": false, "first_name": "Ivan", "username": "ivan"},
                    "text": "Lenina 10"
                }
            }"#,
        );

        let inbound = update.into_inbound().unwrap();
        assert_eq!(inbound.chat, TelegramId::new(1001));
        assert_eq!(inbound.sender.first_name.as_deref(), Some("Ivan"));
        assert_eq!(inbound.action, Action::Text("Lenina 10".to_string()));
    }

    #[test]
    fn start_command_is_recognised() {
        let update = parse(
            r#"{"update_id": 2, "message": {"message_id": 11,
                "chat": {"id": 5, "type": "private"},
                "from": {"id": 5, "is_bot": false, "first_name": "A"},
                "text": "/start"}}"#,
        );
        assert_eq!(update.into_inbound().unwrap().action, Action::Start);
    }

    #[test]
    fn contact_keeps_owner() {
        let update = parse(
            r#"{"update_id": 3, "message": {"message_id": 12,
                "chat": {"id": 5, "type": "private"},
                "from": {"id": 5, "is_bot": false, "first_name": "A"},
                "contact": {"phone_number": "+79001234567", "first_name": "A", "user_id": 5}}}"#,
        );
        assert_eq!(
            update.into_inbound().unwrap().action,
            Action::Contact(ContactShare {
                phone_number: "+79001234567".to_string(),
                owner: Some(TelegramId::new(5)),
            })
        );
    }

    #[test]
    fn non_message_updates_are_ignored() {
        let update = parse(r#"{"update_id": 4, "edited_message": {"message_id": 1}}"#);
        assert!(update.into_inbound().is_none());
    }

    #[test]
    fn sticker_without_text_is_ignored() {
        let update = parse(
            r#"{"update_id": 5, "message": {"message_id": 13,
                "chat": {"id": 5, "type": "private"},
                "from": {"id": 5, "is_bot": false, "first_name": "A"},
                "sticker": {"file_id": "x"}}}"#,
        );
        assert!(update.into_inbound().is_none());
    }
}
