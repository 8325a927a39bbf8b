//! Redis-backed session store for multi-instance deployments.
//!
//! Sessions are stored as JSON under `barsuk:session:{chat}` and expire
//! after the configured TTL, so abandoned flows clean themselves up.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::TelegramId;
use crate::ports::{SessionStore, SessionStoreError};

const KEY_PREFIX: &str = "barsuk:session";

/// Session store shared by every bot instance.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    fn key(chat: TelegramId) -> String {
        format!("{}:{}", KEY_PREFIX, chat)
    }
}

fn backend(e: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Backend(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, chat: TelegramId) -> Result<Option<ConversationSession>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::key(chat)).await.map_err(backend)?;

        match raw {
            None => Ok(None),
            Some(json) => match serde_json::from_str(&json) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    // Unreadable sessions (e.g. after a format change) restart from idle.
                    tracing::warn!(chat = %chat, error = %e, "Discarding unreadable session");
                    conn.del::<_, ()>(Self::key(chat)).await.map_err(backend)?;
                    Ok(None)
                }
            },
        }
    }

    async fn save(
        &self,
        chat: TelegramId,
        session: &ConversationSession,
    ) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(session)
            .map_err(|e| SessionStoreError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(Self::key(chat))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(backend)
    }

    async fn clear(&self, chat: TelegramId) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(chat)).await.map_err(backend)
    }
}
