//! HTTP routes for the staff console.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use secrecy::SecretString;

use crate::adapters::http::middleware::api_key_middleware;

use super::handlers::{
    get_request, list_requests, reply_to_request, update_request_status, ConsoleHandlers,
};

/// Console API under `/api/requests`, every route behind the API key.
pub fn console_routes(handlers: ConsoleHandlers, api_key: SecretString) -> Router {
    Router::new()
        .route("/api/requests", get(list_requests))
        .route("/api/requests/:id", get(get_request))
        .route("/api/requests/:id/status", patch(update_request_status))
        .route("/api/requests/:id/reply", post(reply_to_request))
        .route_layer(middleware::from_fn_with_state(
            Arc::new(api_key),
            api_key_middleware,
        ))
        .with_state(handlers)
}
