//! ReplyToRequestHandler - staff reply relayed to the requester's chat.
//!
//! The status and notes change is applied first. Relaying the reply is a
//! separate step whose failure is reported in the outcome and never rolls
//! the change back.

use std::sync::Arc;

use crate::domain::conversation::{texts, Keyboard, Reply};
use crate::domain::foundation::{DomainError, RequestId, ValidationError};
use crate::domain::request::SubmittedRequest;
use crate::ports::{DeliveryError, Messenger, RequestRepository};

/// Command to answer a request.
#[derive(Debug, Clone)]
pub struct ReplyToRequestCommand {
    pub request_id: RequestId,
    pub staff_name: String,
    pub reply: String,
}

/// Applied change plus the result of relaying it.
#[derive(Debug)]
pub struct ReplyOutcome {
    pub request: SubmittedRequest,
    pub delivery: Result<(), DeliveryError>,
}

impl ReplyOutcome {
    pub fn delivered(&self) -> bool {
        self.delivery.is_ok()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("Request {0} not found")]
    NotFound(RequestId),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to store reply: {0}")]
    Persistence(#[from] DomainError),
}

pub struct ReplyToRequestHandler {
    requests: Arc<dyn RequestRepository>,
    messenger: Arc<dyn Messenger>,
}

impl ReplyToRequestHandler {
    pub fn new(requests: Arc<dyn RequestRepository>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            requests,
            messenger,
        }
    }

    pub async fn handle(&self, cmd: ReplyToRequestCommand) -> Result<ReplyOutcome, ReplyError> {
        let mut request = self
            .requests
            .find_by_id(cmd.request_id)
            .await?
            .ok_or(ReplyError::NotFound(cmd.request_id))?;

        request.record_reply(&cmd.staff_name, &cmd.reply)?;
        self.requests
            .update_status_and_notes(request.id, request.status, request.manager_notes.as_deref())
            .await?;

        let message = Reply::new(texts::staff_reply(request.id, cmd.reply.trim()), Keyboard::Keep);
        let delivery = self.messenger.send(request.telegram_id, &message).await;

        match &delivery {
            Ok(()) => tracing::info!(
                request_id = %request.id,
                telegram_id = %request.telegram_id,
                "Staff reply delivered"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                request_id = %request.id,
                telegram_id = %request.telegram_id,
                "Staff reply stored but not delivered"
            ),
        }

        Ok(ReplyOutcome { request, delivery })
    }
}
