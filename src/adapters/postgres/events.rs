//! PostgreSQL implementation of EventLog.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::conversation::UserEvent;
use crate::domain::foundation::{DomainError, TelegramId};
use crate::ports::EventLog;

/// Appends rows to `barsuk_app_event`.
#[derive(Clone)]
pub struct PostgresEventLog {
    pool: PgPool,
}

impl PostgresEventLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLog for PostgresEventLog {
    async fn record(&self, telegram_id: TelegramId, event: &UserEvent) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO barsuk_app_event (user_id, event_type, event_data, created_at)
            SELECT id, $2, $3, NOW()
            FROM barsuk_app_telegramuser
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id.value())
        .bind(event.event_type())
        .bind(event.data())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert event: {}", e)))?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                telegram_id = %telegram_id,
                event_type = event.event_type(),
                "Event for unknown user skipped"
            );
        }

        Ok(())
    }
}
