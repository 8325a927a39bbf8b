//! In-memory event log.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::UserEvent;
use crate::domain::foundation::{DomainError, TelegramId};
use crate::ports::EventLog;

/// Records events in order for later inspection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    events: Arc<RwLock<Vec<(TelegramId, UserEvent)>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event types recorded for one user, oldest first.
    pub async fn event_types(&self, telegram_id: TelegramId) -> Vec<&'static str> {
        self.events
            .read()
            .await
            .iter()
            .filter(|(id, _)| *id == telegram_id)
            .map(|(_, event)| event.event_type())
            .collect()
    }

    pub async fn all(&self) -> Vec<(TelegramId, UserEvent)> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn record(&self, telegram_id: TelegramId, event: &UserEvent) -> Result<(), DomainError> {
        self.events.write().await.push((telegram_id, event.clone()));
        Ok(())
    }
}
