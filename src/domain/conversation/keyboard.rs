//! Reply keyboards attached to bot messages.

use serde::{Deserialize, Serialize};

use super::labels::QuickReply;
use super::session::TransferField;

/// Keyboard shown under a reply. Adapters render it for the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyboard {
    /// Leave whatever keyboard the chat currently shows.
    Keep,
    /// Hide any keyboard currently shown.
    Remove,
    Cancel,
    /// Comment step: skip or cancel.
    Comment,
    Confirm,
    EditFields,
    MainMenu,
    Age,
    Consent,
    /// Single contact-request button.
    Phone,
}

impl Keyboard {
    /// Button rows, top to bottom.
    pub fn rows(&self) -> Vec<Vec<QuickReply>> {
        use QuickReply::*;
        match self {
            Keyboard::Keep | Keyboard::Remove => vec![],
            Keyboard::Cancel => vec![vec![Cancel]],
            Keyboard::Comment => vec![vec![SkipComment], vec![Cancel]],
            Keyboard::Confirm => vec![vec![ConfirmSend], vec![Edit], vec![Cancel]],
            Keyboard::EditFields => vec![
                vec![EditField(TransferField::Address)],
                vec![EditField(TransferField::Date)],
                vec![EditField(TransferField::Time)],
                vec![EditField(TransferField::Guests)],
                vec![EditField(TransferField::Comment)],
                vec![AllCorrect],
                vec![Cancel],
            ],
            Keyboard::MainMenu => vec![
                vec![MenuPrograms],
                vec![OrderTransfer, ContactManager],
                vec![MyStatus, PromoCodes],
                vec![Rules],
            ],
            Keyboard::Age => vec![vec![AgeConfirm], vec![AgeDeny]],
            Keyboard::Consent => vec![vec![ConsentAccept], vec![ConsentDecline]],
            Keyboard::Phone => vec![vec![SharePhone]],
        }
    }

    /// Whether the keyboard should hide after one press.
    pub fn one_time(&self) -> bool {
        !matches!(
            self,
            Keyboard::MainMenu | Keyboard::EditFields | Keyboard::Remove | Keyboard::Keep
        )
    }

    /// Whether the buttons ask the client to share the user's contact.
    pub fn requests_contact(&self) -> bool {
        matches!(self, Keyboard::Phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_menu_is_persistent() {
        assert!(!Keyboard::MainMenu.one_time());
        assert!(Keyboard::Confirm.one_time());
    }

    #[test]
    fn edit_menu_offers_every_field() {
        let buttons: Vec<_> = Keyboard::EditFields.rows().into_iter().flatten().collect();
        for field in TransferField::ORDER {
            assert!(buttons.contains(&QuickReply::EditField(field)));
        }
    }

    #[test]
    fn only_phone_keyboard_requests_contact() {
        assert!(Keyboard::Phone.requests_contact());
        assert!(!Keyboard::Age.requests_contact());
    }

    #[test]
    fn remove_has_no_rows() {
        assert!(Keyboard::Remove.rows().is_empty());
    }
}
