//! In-memory session store.
//!
//! Sessions are lost on restart, which sends every chat back to idle.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::TelegramId;
use crate::ports::{SessionStore, SessionStoreError};

/// Per-process session map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<TelegramId, ConversationSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats currently inside a flow.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, chat: TelegramId) -> Result<Option<ConversationSession>, SessionStoreError> {
        Ok(self.sessions.read().await.get(&chat).cloned())
    }

    async fn save(
        &self,
        chat: TelegramId,
        session: &ConversationSession,
    ) -> Result<(), SessionStoreError> {
        self.sessions.write().await.insert(chat, session.clone());
        Ok(())
    }

    async fn clear(&self, chat: TelegramId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(&chat);
        Ok(())
    }
}
