//! Outbound message port.

use async_trait::async_trait;

use crate::domain::conversation::Reply;
use crate::domain::foundation::TelegramId;

/// Why a message did not reach the chat.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("Delivery timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Rejected by chat platform ({status}): {description}")]
    Rejected { status: u16, description: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Sends messages to a chat.
///
/// Delivery failure is a value: implementations never panic and bound
/// every call with a timeout.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, chat: TelegramId, reply: &Reply) -> Result<(), DeliveryError>;
}
