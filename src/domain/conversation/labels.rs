//! Quick-reply vocabulary.
//!
//! Every button the bot offers is a `QuickReply`. Flows match on the enum,
//! never on display text; `parse` is the only place label strings are
//! compared.

use super::session::TransferField;

/// A fixed quick-reply button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickReply {
    Cancel,
    ConfirmSend,
    Edit,
    EditField(TransferField),
    AllCorrect,
    SkipComment,
    AgeConfirm,
    AgeDeny,
    ConsentAccept,
    ConsentDecline,
    SharePhone,
    MenuPrograms,
    OrderTransfer,
    ContactManager,
    MyStatus,
    PromoCodes,
    Rules,
}

impl QuickReply {
    const ALL: [QuickReply; 21] = [
        QuickReply::Cancel,
        QuickReply::ConfirmSend,
        QuickReply::Edit,
        QuickReply::EditField(TransferField::Address),
        QuickReply::EditField(TransferField::Date),
        QuickReply::EditField(TransferField::Time),
        QuickReply::EditField(TransferField::Guests),
        QuickReply::EditField(TransferField::Comment),
        QuickReply::AllCorrect,
        QuickReply::SkipComment,
        QuickReply::AgeConfirm,
        QuickReply::AgeDeny,
        QuickReply::ConsentAccept,
        QuickReply::ConsentDecline,
        QuickReply::SharePhone,
        QuickReply::MenuPrograms,
        QuickReply::OrderTransfer,
        QuickReply::ContactManager,
        QuickReply::MyStatus,
        QuickReply::PromoCodes,
        QuickReply::Rules,
    ];

    /// Button text as shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            QuickReply::Cancel => "❌ Cancel",
            QuickReply::ConfirmSend => "✅ Yes, send",
            QuickReply::Edit => "✏️ Edit",
            QuickReply::EditField(field) => match field {
                TransferField::Address => "📍 Address",
                TransferField::Date => "📅 Date",
                TransferField::Time => "🕐 Time",
                TransferField::Guests => "👥 Guests",
                TransferField::Comment => "💬 Comment",
            },
            QuickReply::AllCorrect => "✅ All correct, send",
            QuickReply::SkipComment => "⏭ Skip",
            QuickReply::AgeConfirm => "✅ I am 18+",
            QuickReply::AgeDeny => "❌ No, I am under 18",
            QuickReply::ConsentAccept => "✅ I agree to data processing",
            QuickReply::ConsentDecline => "❌ Decline",
            QuickReply::SharePhone => "📱 Share phone number",
            QuickReply::MenuPrograms => "📌 Menu / Programs",
            QuickReply::OrderTransfer => "🚖 Order a transfer",
            QuickReply::ContactManager => "💬 Contact a manager",
            QuickReply::MyStatus => "⭐ My status",
            QuickReply::PromoCodes => "🎁 Promo codes",
            QuickReply::Rules => "ℹ️ Rules / FAQ",
        }
    }

    /// Matches user text against the vocabulary (surrounding whitespace ignored).
    pub fn parse(text: &str) -> Option<QuickReply> {
        let text = text.trim();
        Self::ALL.iter().copied().find(|reply| reply.label() == text)
    }
}
