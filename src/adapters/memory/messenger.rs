//! Messenger that records outgoing messages instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Reply;
use crate::domain::foundation::TelegramId;
use crate::ports::{DeliveryError, Messenger};

/// Captures every message for assertions. Can be switched to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingMessenger {
    sent: Arc<RwLock<Vec<(TelegramId, Reply)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A messenger whose deliveries all fail with a connection error.
    pub fn failing() -> Self {
        let messenger = Self::default();
        messenger.set_failing(true);
        messenger
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages delivered to one chat, oldest first.
    pub async fn sent_to(&self, chat: TelegramId) -> Vec<Reply> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|(to, _)| *to == chat)
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    /// Last message delivered to one chat.
    pub async fn last_to(&self, chat: TelegramId) -> Option<Reply> {
        self.sent_to(chat).await.pop()
    }

    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, chat: TelegramId, reply: &Reply) -> Result<(), DeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Connection("simulated outage".to_string()));
        }
        self.sent.write().await.push((chat, reply.clone()));
        Ok(())
    }
}
