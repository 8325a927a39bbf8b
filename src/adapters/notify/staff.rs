//! Staff notifier: announces new requests to the configured staff chats.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::domain::conversation::{texts, Keyboard, Reply};
use crate::domain::foundation::TelegramId;
use crate::domain::request::SubmittedRequest;
use crate::ports::{Messenger, NotificationReport, RequestNotifier};

/// Fans a request announcement out to every staff chat concurrently.
///
/// With no staff chats configured the announcement becomes a structured
/// log event and the report stays empty.
pub struct StaffNotifier {
    messenger: Arc<dyn Messenger>,
    staff_chats: Vec<TelegramId>,
}

impl StaffNotifier {
    pub fn new(messenger: Arc<dyn Messenger>, staff_chats: Vec<TelegramId>) -> Self {
        Self {
            messenger,
            staff_chats,
        }
    }
}

#[async_trait]
impl RequestNotifier for StaffNotifier {
    async fn notify_new_request(&self, request: &SubmittedRequest) -> NotificationReport {
        if self.staff_chats.is_empty() {
            tracing::info!(
                request_id = %request.id,
                kind = %request.kind,
                telegram_id = %request.telegram_id,
                payload = %serde_json::to_string(&request.payload).unwrap_or_default(),
                "New request (no staff chats configured)"
            );
            return NotificationReport::default();
        }

        let reply = Reply::new(texts::staff_notification(request), Keyboard::Keep);
        let results = join_all(
            self.staff_chats
                .iter()
                .map(|chat| self.messenger.send(*chat, &reply)),
        )
        .await;

        let mut report = NotificationReport::default();
        for (chat, result) in self.staff_chats.iter().zip(results) {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        staff_chat = %chat,
                        request_id = %request.id,
                        "Failed to notify staff chat"
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }
}
