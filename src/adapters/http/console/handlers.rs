//! HTTP handlers for the staff console endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::console::{
    GetRequestHandler, ListRequestsHandler, ReplyError, ReplyToRequestCommand,
    ReplyToRequestHandler, StatusUpdateError, UpdateRequestStatusCommand,
    UpdateRequestStatusHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, RequestId};
use crate::ports::RequestFilter;

use super::dto::{
    ErrorResponse, ListRequestsQuery, ReplyRequest, ReplyResponse, RequestListResponse,
    RequestResponse, UpdateStatusRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ConsoleHandlers {
    list_handler: Arc<ListRequestsHandler>,
    get_handler: Arc<GetRequestHandler>,
    status_handler: Arc<UpdateRequestStatusHandler>,
    reply_handler: Arc<ReplyToRequestHandler>,
}

impl ConsoleHandlers {
    pub fn new(
        list_handler: Arc<ListRequestsHandler>,
        get_handler: Arc<GetRequestHandler>,
        status_handler: Arc<UpdateRequestStatusHandler>,
        reply_handler: Arc<ReplyToRequestHandler>,
    ) -> Self {
        Self {
            list_handler,
            get_handler,
            status_handler,
            reply_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/requests - List requests, newest first
pub async fn list_requests(
    State(handlers): State<ConsoleHandlers>,
    Query(query): Query<ListRequestsQuery>,
) -> Response {
    let defaults = RequestFilter::default();
    let filter = RequestFilter {
        status: query.status,
        kind: query.kind,
        limit: query.limit.unwrap_or(defaults.limit),
    };

    match handlers.list_handler.handle(filter).await {
        Ok(requests) => {
            let response: RequestListResponse = requests.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_domain_error(e),
    }
}

/// GET /api/requests/:id - Single request
pub async fn get_request(
    State(handlers): State<ConsoleHandlers>,
    Path(request_id): Path<String>,
) -> Response {
    let request_id = match parse_request_id(&request_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(request_id).await {
        Ok(request) => {
            let response: RequestResponse = request.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_domain_error(e),
    }
}

/// PATCH /api/requests/:id/status - Change status, optionally replacing notes
pub async fn update_request_status(
    State(handlers): State<ConsoleHandlers>,
    Path(request_id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Response {
    let request_id = match parse_request_id(&request_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = UpdateRequestStatusCommand {
        request_id,
        status: body.status,
        notes: body.notes,
    };

    match handlers.status_handler.handle(cmd).await {
        Ok(request) => {
            let response: RequestResponse = request.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_status_error(e),
    }
}

/// POST /api/requests/:id/reply - Record a staff reply and relay it to the user
pub async fn reply_to_request(
    State(handlers): State<ConsoleHandlers>,
    Path(request_id): Path<String>,
    Json(body): Json<ReplyRequest>,
) -> Response {
    let request_id = match parse_request_id(&request_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = ReplyToRequestCommand {
        request_id,
        staff_name: body.staff_name,
        reply: body.reply,
    };

    match handlers.reply_handler.handle(cmd).await {
        Ok(outcome) => {
            let delivered = outcome.delivered();
            let response = ReplyResponse {
                delivered,
                delivery_error: outcome.delivery.err().map(|e| e.to_string()),
                request: outcome.request.into(),
            };
            // The change is applied either way; 502 only reports the relay.
            let status = if delivered {
                StatusCode::OK
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, Json(response)).into_response()
        }
        Err(e) => handle_reply_error(e),
    }
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn parse_request_id(raw: &str) -> Result<RequestId, Response> {
    raw.parse::<RequestId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid request ID")),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_domain_error(error: DomainError) -> Response {
    match error.code {
        ErrorCode::RequestNotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                code: "NOT_FOUND".to_string(),
                message: error.message,
            }),
        )
            .into_response(),
        _ => {
            tracing::error!(error = %error, "Console request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal error")),
            )
                .into_response()
        }
    }
}

fn handle_status_error(error: StatusUpdateError) -> Response {
    match error {
        StatusUpdateError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Request", &id.to_string())),
        )
            .into_response(),
        StatusUpdateError::Invalid(e) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(e.to_string())),
        )
            .into_response(),
        StatusUpdateError::Persistence(e) => handle_domain_error(e),
    }
}

fn handle_reply_error(error: ReplyError) -> Response {
    match error {
        ReplyError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Request", &id.to_string())),
        )
            .into_response(),
        ReplyError::Invalid(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response(),
        ReplyError::Persistence(e) => handle_domain_error(e),
    }
}
