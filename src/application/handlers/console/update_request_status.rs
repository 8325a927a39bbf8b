//! UpdateRequestStatusHandler - staff status change from the console.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, RequestId, ValidationError};
use crate::domain::request::{RequestStatus, SubmittedRequest};
use crate::ports::RequestRepository;

/// Command to move a request to a new status.
#[derive(Debug, Clone)]
pub struct UpdateRequestStatusCommand {
    pub request_id: RequestId,
    pub status: RequestStatus,
    /// Replaces the manager notes when present.
    pub notes: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StatusUpdateError {
    #[error("Request {0} not found")]
    NotFound(RequestId),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to update request: {0}")]
    Persistence(#[from] DomainError),
}

pub struct UpdateRequestStatusHandler {
    requests: Arc<dyn RequestRepository>,
}

impl UpdateRequestStatusHandler {
    pub fn new(requests: Arc<dyn RequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(
        &self,
        cmd: UpdateRequestStatusCommand,
    ) -> Result<SubmittedRequest, StatusUpdateError> {
        let mut request = self
            .requests
            .find_by_id(cmd.request_id)
            .await?
            .ok_or(StatusUpdateError::NotFound(cmd.request_id))?;

        let from = request.status;
        request.change_status(cmd.status, cmd.notes)?;
        self.requests
            .update_status_and_notes(request.id, request.status, request.manager_notes.as_deref())
            .await?;

        tracing::info!(
            request_id = %request.id,
            from = %from,
            to = %request.status,
            "Request status updated"
        );
        Ok(request)
    }
}
