//! Event log port.

use async_trait::async_trait;

use crate::domain::conversation::UserEvent;
use crate::domain::foundation::{DomainError, TelegramId};

/// Append-only log of user activity.
///
/// Events for Telegram ids without an identity are skipped, not errors.
/// Callers treat failures as non-fatal.
#[async_trait]
pub trait EventLog: Send + Sync {
    async fn record(&self, telegram_id: TelegramId, event: &UserEvent) -> Result<(), DomainError>;
}
