//! HTTP DTOs for the staff console endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::request::{RequestKind, RequestStatus, SubmittedRequest};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for listing requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRequestsQuery {
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub kind: Option<RequestKind>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Body of `PATCH /api/requests/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /api/requests/:id/reply`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyRequest {
    pub reply: String,
    pub staff_name: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct RequestResponse {
    pub id: i64,
    pub user_id: i64,
    pub telegram_id: i64,
    pub kind: RequestKind,
    pub status: RequestStatus,
    /// Payload exactly as stored in the `data` column.
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SubmittedRequest> for RequestResponse {
    fn from(request: SubmittedRequest) -> Self {
        Self {
            id: request.id.value(),
            user_id: request.user_id.value(),
            telegram_id: request.telegram_id.value(),
            kind: request.kind,
            status: request.status,
            data: serde_json::to_value(&request.payload).unwrap_or(serde_json::Value::Null),
            manager_notes: request.manager_notes,
            created_at: request.created_at.as_datetime().to_rfc3339(),
            updated_at: request.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestListResponse {
    pub items: Vec<RequestResponse>,
    pub count: usize,
}

impl From<Vec<SubmittedRequest>> for RequestListResponse {
    fn from(requests: Vec<SubmittedRequest>) -> Self {
        let items: Vec<RequestResponse> = requests.into_iter().map(Into::into).collect();
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Result of a staff reply: the applied change and whether it reached the user.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyResponse {
    pub request: RequestResponse,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_error: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: "CONFLICT".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
