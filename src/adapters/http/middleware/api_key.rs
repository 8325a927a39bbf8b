//! API key middleware guarding the staff console routes.
//!
//! Expects the key in the `X-Api-Key` header and compares it in constant
//! time. Missing or wrong keys get `401` before any handler runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware state - the expected console key.
pub type ApiKeyState = Arc<SecretString>;

pub async fn api_key_middleware(
    State(expected): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|value| value.as_bytes())
        .unwrap_or_default();

    let matches: bool = provided
        .ct_eq(expected.expose_secret().as_bytes())
        .into();

    if !provided.is_empty() && matches {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Console call with missing or wrong API key");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "code": "UNAUTHORIZED",
            "message": "Missing or invalid API key"
        })),
    )
        .into_response()
}
