//! Submitted request aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    RequestId, StateMachine, TelegramId, Timestamp, UserId, ValidationError,
};

use super::{RequestKind, RequestPayload, RequestStatus};

/// A request ready to be written; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub user_id: UserId,
    pub telegram_id: TelegramId,
    pub payload: RequestPayload,
}

impl NewRequest {
    pub fn kind(&self) -> RequestKind {
        self.payload.kind()
    }
}

/// A persisted service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedRequest {
    pub id: RequestId,
    pub user_id: UserId,
    pub telegram_id: TelegramId,
    pub kind: RequestKind,
    pub payload: RequestPayload,
    pub status: RequestStatus,
    pub manager_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SubmittedRequest {
    /// Materializes a freshly written request.
    pub fn from_new(id: RequestId, request: NewRequest, created_at: Timestamp) -> Self {
        Self {
            id,
            user_id: request.user_id,
            telegram_id: request.telegram_id,
            kind: request.payload.kind(),
            payload: request.payload,
            status: RequestStatus::New,
            manager_notes: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Validates and applies a staff status change, optionally replacing the notes.
    pub fn change_status(
        &mut self,
        status: RequestStatus,
        notes: Option<String>,
    ) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(status)?;
        if let Some(notes) = notes {
            self.manager_notes = Some(notes);
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records a staff reply in the notes and marks the request done.
    pub fn record_reply(&mut self, staff_name: &str, reply: &str) -> Result<(), ValidationError> {
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ValidationError::empty_field("reply"));
        }
        let notes = format!("Manager reply ({}):\n{}", staff_name.trim(), reply);
        self.change_status(RequestStatus::Done, Some(notes))
    }
}
