//! SubmitRequestHandler - commits a confirmed draft as a request.

use std::sync::Arc;

use crate::domain::conversation::UserEvent;
use crate::domain::foundation::{DomainError, TelegramId};
use crate::domain::request::{NewRequest, RequestDetails, RequestPayload, SubmittedRequest};
use crate::ports::{EventLog, RequestNotifier, RequestRepository, UserRepository};

/// Command to commit a finalized draft.
#[derive(Debug, Clone)]
pub struct SubmitRequestCommand {
    pub telegram_id: TelegramId,
    pub details: RequestDetails,
}

/// Why a commit did not produce a request.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The sender has no identity; nothing was written.
    #[error("No user identity for telegram id {0}")]
    IdentityNotFound(TelegramId),

    /// The sender lost access (blocked or deleted) after entering the flow;
    /// nothing was written.
    #[error("User {0} no longer has access")]
    AccessRevoked(TelegramId),

    /// The lookup or the write failed; nothing was written.
    #[error("Failed to store request: {0}")]
    Persistence(#[from] DomainError),
}

/// Handler for the commit step of both intake flows.
pub struct SubmitRequestHandler {
    users: Arc<dyn UserRepository>,
    requests: Arc<dyn RequestRepository>,
    events: Arc<dyn EventLog>,
    notifier: Arc<dyn RequestNotifier>,
}

impl SubmitRequestHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        requests: Arc<dyn RequestRepository>,
        events: Arc<dyn EventLog>,
        notifier: Arc<dyn RequestNotifier>,
    ) -> Self {
        Self {
            users,
            requests,
            events,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: SubmitRequestCommand) -> Result<SubmittedRequest, SubmitError> {
        // 1. Re-resolve the identity; the session may outlive it
        let user = self
            .users
            .find_by_telegram_id(cmd.telegram_id)
            .await?
            .ok_or(SubmitError::IdentityNotFound(cmd.telegram_id))?;
        if !user.has_access() {
            return Err(SubmitError::AccessRevoked(cmd.telegram_id));
        }

        // 2. Persist with a snapshot of the requester's contact details
        let event_details = cmd.details.clone();
        let payload = RequestPayload::new(cmd.details, user.snapshot());
        let request = self
            .requests
            .create(NewRequest {
                user_id: user.id,
                telegram_id: user.telegram_id,
                payload,
            })
            .await?;

        tracing::info!(
            request_id = %request.id,
            telegram_id = %cmd.telegram_id,
            kind = %request.kind,
            "Request submitted"
        );

        // 3. Log; failures here never undo the commit
        let event = match event_details {
            RequestDetails::Transfer(details) => UserEvent::TransferRequestSubmitted {
                request_id: request.id,
                address: details.address,
                guests: details.guests,
            },
            RequestDetails::Manager(details) => UserEvent::ManagerRequestSubmitted {
                request_id: request.id,
                message_length: details.message.chars().count(),
            },
        };
        if let Err(e) = self.events.record(cmd.telegram_id, &event).await {
            tracing::warn!(error = %e, request_id = %request.id, "Failed to log submission event");
        }

        // 4. Tell staff
        let report = self.notifier.notify_new_request(&request).await;
        if report.failed > 0 {
            tracing::warn!(
                request_id = %request.id,
                delivered = report.delivered,
                failed = report.failed,
                "Some staff notifications failed"
            );
        }

        Ok(request)
    }
}
