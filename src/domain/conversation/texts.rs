//! User-facing message texts.
//!
//! Messages are sent with HTML parse mode, so anything the user typed must
//! pass through [`escape_html`] before it is embedded.

use crate::domain::content::MenuSection;
use crate::domain::foundation::RequestId;
use crate::domain::request::{RequestKind, RequestPayload, SubmittedRequest};

use super::session::{ManagerDraft, TransferDraft, TransferField};

/// Escapes `&`, `<`, `>` and `"` for Telegram HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// Registration
// ════════════════════════════════════════════════════════════════════════════

pub const AGE_PROMPT: &str = "👋 <b>Welcome!</b>\n\n\
This bot is for adults only.\n\
Please confirm that you are 18 or older.";

pub const CONSENT_PROMPT: &str = "📄 <b>Personal data</b>\n\n\
To process your requests we store your name, Telegram username and phone number.\n\
Do you agree to the processing of your personal data?";

pub const PHONE_PROMPT: &str =
    "✅ Thank you! Now we need your phone number to contact you.\nPress the button below.";

pub const PHONE_NOT_OWN: &str =
    "❌ Please share your own phone number using the button below.";

pub const AGE_REJECTED: &str = "❌ Access to the bot is denied. Adults only.";

pub const CONSENT_REJECTED: &str =
    "❌ Consent to data processing is required to use the bot.";

pub const REGISTRATION_FAILED: &str =
    "❌ Could not save your data. Please try again with /start";

pub const BLOCKED: &str = "❌ Access to the bot is denied.";

pub fn registration_complete(phone: &str) -> String {
    format!(
        "✅ Registration complete!\n\nPhone: {}\n\n{}",
        escape_html(phone),
        MAIN_MENU
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Main menu
// ════════════════════════════════════════════════════════════════════════════

pub const MAIN_MENU: &str = "🏠 <b>Main menu</b>\n\nChoose a section:";

pub const ACCESS_DENIED: &str = "❌ Access denied. Please register with /start";

pub const MENU_UNAVAILABLE: &str = "🍷 The menu is temporarily unavailable. We will update it soon!";

pub const RULES: &str = "ℹ️ <b>Rules / FAQ</b>\n\n\
• Entry for guests aged 18 and over only.\n\
• Please have an ID with you.\n\
• Transfers are confirmed by a manager by phone.\n\
• Questions? Use \"💬 Contact a manager\".";

pub const STATUS_PLACEHOLDER: &str = "⭐ <b>Loyalty program</b>\n\n\
This feature will be available in the next update.\nStay tuned!";

pub const PROMO_PLACEHOLDER: &str = "🎁 <b>Promo codes and offers</b>\n\n\
This feature will be available in the next update.\nStay tuned!";

pub const TRY_AGAIN: &str = "⚠️ Something went wrong. Please try again.";

/// Menu listing: every category with its items and prices.
pub fn menu(sections: &[MenuSection]) -> String {
    let mut text = String::from("🍷 <b>Our menu</b>\n");
    for section in sections {
        text.push_str(&format!("\n<b>{}</b>\n", escape_html(&section.category.name)));
        if section.items.is_empty() {
            text.push_str("No items in this category yet\n");
            continue;
        }
        for item in &section.items {
            text.push_str(&format!("• <b>{}</b>\n", escape_html(&item.name)));
            if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
                text.push_str(&format!("  {}\n", escape_html(description)));
            }
            text.push_str(&format!("  {}\n", item.price_display()));
        }
    }
    text
}

// ════════════════════════════════════════════════════════════════════════════
// Request intake
// ════════════════════════════════════════════════════════════════════════════

pub const TRANSFER_INTRO: &str = "🚖 <b>Transfer order</b>\n\n\
Fill in the form to order a transfer:\n\n\
1. <b>Enter the pickup address:</b>\n\
(street, building and entrance, the more detail the better)";

pub const MANAGER_INTRO: &str = "💬 <b>Contact a manager</b>\n\n\
Describe your question or topic:\n\
(the more detail, the faster we can help)";

pub const MANAGER_EDIT: &str = "✏️ <b>Edit your message:</b>";

pub const EDIT_MENU: &str = "✏️ <b>What would you like to change?</b>";

pub const CANCELLED: &str = "❌ Request cancelled.";

pub const IDENTITY_MISSING: &str =
    "❌ Error: user not found. Please restart the bot with /start";

pub const SUBMIT_FAILED: &str =
    "❌ Could not send the request right now. Please try again.";

pub const MESSAGE_TOO_SHORT: &str =
    "❌ The message is too short. Describe your question in more detail:";

/// Prompt for a field during first entry.
pub fn field_prompt(field: TransferField) -> &'static str {
    match field {
        TransferField::Address => TRANSFER_INTRO,
        TransferField::Date => {
            "2. <b>Choose the date:</b>\nWrite 'today', 'tomorrow' or a date as DD.MM:"
        }
        TransferField::Time => {
            "3. <b>Enter the time:</b>\nFormat HH:MM (for example 22:30 or 19:00)"
        }
        TransferField::Guests => "4. <b>Number of guests:</b>\nEnter a number from 1 to 10:",
        TransferField::Comment => {
            "5. <b>Comment (optional):</b>\nAdd any wishes or press \"⏭ Skip\":"
        }
    }
}

/// Prompt for a field re-entered from the edit menu.
pub fn revise_prompt(field: TransferField) -> &'static str {
    match field {
        TransferField::Address => "Enter the new address:",
        TransferField::Date => "Enter the new date ('today', 'tomorrow' or DD.MM):",
        TransferField::Time => "Enter the new time (HH:MM):",
        TransferField::Guests => "Enter the new number of guests (1 to 10):",
        TransferField::Comment => "Enter the new comment or press \"⏭ Skip\":",
    }
}

/// Corrective message after a rejected value.
pub fn field_error(field: TransferField) -> &'static str {
    match field {
        TransferField::Address => "❌ The address is too short. Enter the full address:",
        TransferField::Date => {
            "❌ Invalid date. Use:\n- 'today'\n- 'tomorrow'\n- a date as DD.MM (for example 15.02)"
        }
        TransferField::Time => {
            "❌ Invalid time. Use the HH:MM format\nFor example: 22:30, 19:00, 02:15"
        }
        TransferField::Guests => "❌ Enter a number from 1 to 10:",
        TransferField::Comment => "❌ Type a comment or press Skip:",
    }
}

pub fn transfer_summary(draft: &TransferDraft) -> String {
    let value = |v: &Option<String>| {
        v.as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "not set".to_string())
    };
    let mut text = format!(
        "📋 <b>Please check the details:</b>\n\n\
         📍 <b>Address:</b> {}\n\
         📅 <b>Date:</b> {}\n\
         🕐 <b>Time:</b> {}\n\
         👥 <b>Guests:</b> {}\n",
        value(&draft.address),
        value(&draft.date),
        value(&draft.time),
        draft
            .guests
            .map(|g| g.to_string())
            .unwrap_or_else(|| "not set".to_string()),
    );
    if let Some(comment) = draft.comment.as_deref().filter(|c| !c.is_empty()) {
        text.push_str(&format!("💬 <b>Comment:</b> {}\n", escape_html(comment)));
    }
    text.push_str("\n✅ Is everything correct?");
    text
}

pub fn manager_summary(draft: &ManagerDraft) -> String {
    format!(
        "📋 <b>Your message:</b>\n\n{}\n\n✅ Send it to a manager?",
        escape_html(draft.message.as_deref().unwrap_or(""))
    )
}

/// Acknowledgement after a request is stored.
pub fn submitted(kind: RequestKind, id: RequestId) -> String {
    let wait = match kind {
        RequestKind::Transfer => {
            "📞 A manager will contact you to confirm.\n⏱️ This usually takes 10-15 minutes."
        }
        RequestKind::Manager => {
            "📞 A manager will contact you shortly.\n⏱️ Average response time: 15-30 minutes."
        }
    };
    format!(
        "✅ <b>Request #{} sent!</b>\n\n{}\n\n<i>Keep the request number for reference.</i>",
        id, wait
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Staff
// ════════════════════════════════════════════════════════════════════════════

/// Announcement of a new request for staff chats.
pub fn staff_notification(request: &SubmittedRequest) -> String {
    let info = request.payload.user_info();
    let mut text = format!(
        "🔔 <b>New request #{}</b>\n\
         Type: {}\n\
         Name: {}\n\
         Phone: {}\n\
         Username: {}\n\
         Created: {}\n\n",
        request.id,
        request.kind.label(),
        escape_html(&info.name),
        escape_html(&info.phone),
        escape_html(&info.username),
        request.created_at.to_display(),
    );
    match &request.payload {
        RequestPayload::Transfer { details, .. } => {
            text.push_str(&format!(
                "📍 {}\n📅 {} 🕐 {}\n👥 {}",
                escape_html(&details.address),
                escape_html(&details.date),
                escape_html(&details.time),
                details.guests
            ));
            if !details.comment.is_empty() {
                text.push_str(&format!("\n💬 {}", escape_html(&details.comment)));
            }
        }
        RequestPayload::Manager { details, .. } => {
            text.push_str(&format!("💬 {}", escape_html(&details.message)));
        }
    }
    text
}

/// Staff reply relayed to the requester.
pub fn staff_reply(id: RequestId, reply: &str) -> String {
    format!(
        "📬 <b>Reply to your request #{}</b>\n\n{}",
        id,
        escape_html(reply.trim())
    )
}
