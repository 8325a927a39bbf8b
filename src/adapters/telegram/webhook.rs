//! Webhook endpoint receiving Bot API updates.
//!
//! Once the secret header checks out the endpoint always answers `200`, so
//! Telegram never redelivers an update the bot already saw. Failures are
//! logged instead.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::application::handlers::chat::Dispatcher;

use super::updates::Update;

/// Header Telegram sets when the webhook was registered with a secret.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct WebhookState {
    dispatcher: Arc<Dispatcher>,
    secret: Option<SecretString>,
}

impl WebhookState {
    pub fn new(dispatcher: Arc<Dispatcher>, secret: Option<SecretString>) -> Self {
        Self { dispatcher, secret }
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.secret else {
            return true;
        };
        let provided = headers
            .get(SECRET_HEADER)
            .map(|value| value.as_bytes())
            .unwrap_or_default();
        provided
            .ct_eq(expected.expose_secret().as_bytes())
            .into()
    }
}

/// POST /telegram/webhook
pub async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    if !state.is_authorized(&headers) {
        tracing::warn!("Webhook call with missing or wrong secret token");
        return StatusCode::UNAUTHORIZED;
    }

    let update: Update = match serde_json::from_value(body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed update");
            return StatusCode::OK;
        }
    };

    let update_id = update.update_id;
    let Some(inbound) = update.into_inbound() else {
        tracing::debug!(update_id, "Ignoring unsupported update");
        return StatusCode::OK;
    };

    if let Err(e) = state.dispatcher.dispatch(inbound).await {
        tracing::error!(error = %e, update_id, "Update handling failed");
    }

    StatusCode::OK
}

pub fn webhook_routes(state: WebhookState) -> Router {
    Router::new()
        .route("/telegram/webhook", post(receive_update))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryEventLog, InMemoryRequestRepository, InMemoryUserRepository, RecordingMessenger,
        StaticContentReader,
    };
    use crate::adapters::notify::StaffNotifier;
    use crate::adapters::session::InMemorySessionStore;
    use axum::http::HeaderValue;

    fn state(secret: Option<&str>) -> WebhookState {
        let messenger = Arc::new(RecordingMessenger::new());
        let dispatcher = Dispatcher::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryRequestRepository::new()),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(StaticContentReader::new(vec![])),
            Arc::new(InMemorySessionStore::new()),
            messenger.clone(),
            Arc::new(StaffNotifier::new(messenger, vec![])),
        );
        WebhookState::new(
            Arc::new(dispatcher),
            secret.map(|s| SecretString::new(s.to_string())),
        )
    }

    #[test]
    fn no_secret_configured_accepts_everything() {
        assert!(state(None).is_authorized(&HeaderMap::new()));
    }

    #[test]
    fn matching_secret_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(SECRET_HEADER, HeaderValue::from_static("s3cret"));
        assert!(state(Some("s3cret")).is_authorized(&headers));
    }

    #[test]
    fn wrong_or_missing_secret_is_refused() {
        let state = state(Some("s3cret"));
        let mut headers = HeaderMap::new();
        assert!(!state.is_authorized(&headers));
        headers.insert(SECRET_HEADER, HeaderValue::from_static("guess"));
        assert!(!state.is_authorized(&headers));
    }

    #[tokio::test]
    async fn malformed_update_still_answers_ok() {
        let status = receive_update(
            State(state(None)),
            HeaderMap::new(),
            Json(serde_json::json!({"unexpected": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unauthorized_call_is_refused() {
        let status = receive_update(
            State(state(Some("s3cret"))),
            HeaderMap::new(),
            Json(serde_json::json!({"update_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
