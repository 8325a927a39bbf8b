//! Session store port.
//!
//! Holds the ephemeral per-chat [`ConversationSession`]. No session means
//! the chat is idle.

use async_trait::async_trait;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::TelegramId;

/// Errors that can occur during session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    Serialization(String),

    #[error("Failed to deserialize session: {0}")]
    Deserialization(String),

    #[error("Session backend unavailable: {0}")]
    Backend(String),
}

/// Port for per-chat conversation sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session, or `None` when idle.
    async fn load(&self, chat: TelegramId) -> Result<Option<ConversationSession>, SessionStoreError>;

    /// Replace the chat's session.
    async fn save(
        &self,
        chat: TelegramId,
        session: &ConversationSession,
    ) -> Result<(), SessionStoreError>;

    /// Drop the chat's session. Clearing an idle chat is not an error.
    async fn clear(&self, chat: TelegramId) -> Result<(), SessionStoreError>;
}
