//! Telegram Bot API adapters.
//!
//! - `TelegramMessenger` - outbound messages (`Messenger` port)
//! - `Update` - inbound update DTOs mapped to dispatcher actions
//! - `webhook_routes` - the webhook endpoint feeding the dispatcher

mod client;
mod updates;
mod webhook;

pub use client::{reply_markup, TelegramConfig, TelegramMessenger};
pub use updates::Update;
pub use webhook::{receive_update, webhook_routes, WebhookState, SECRET_HEADER};
