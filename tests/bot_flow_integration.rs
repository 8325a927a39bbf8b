//! End-to-end tests: Telegram updates in through the webhook, requests out
//! to staff chats, and staff replies back through the console API.
//!
//! Everything runs against the in-memory adapters, wired the same way the
//! server binary wires the PostgreSQL and Bot API ones.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use barsuk_bot::adapters::http::console::{console_routes, ConsoleHandlers};
use barsuk_bot::adapters::memory::{
    InMemoryEventLog, InMemoryRequestRepository, InMemoryUserRepository, RecordingMessenger,
    StaticContentReader,
};
use barsuk_bot::adapters::notify::StaffNotifier;
use barsuk_bot::adapters::session::InMemorySessionStore;
use barsuk_bot::adapters::telegram::{webhook_routes, WebhookState, SECRET_HEADER};
use barsuk_bot::application::handlers::console::{
    GetRequestHandler, ListRequestsHandler, ReplyToRequestHandler, UpdateRequestStatusHandler,
};
use barsuk_bot::application::Dispatcher;
use barsuk_bot::domain::conversation::{texts, Keyboard, QuickReply};
use barsuk_bot::domain::foundation::TelegramId;
use barsuk_bot::domain::request::{RequestKind, RequestStatus};
use barsuk_bot::domain::user::UserStatus;
use barsuk_bot::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

const GUEST: i64 = 1001;
const STAFF_CHAT: i64 = -500;
const WEBHOOK_SECRET: &str = "webhook-secret";
const CONSOLE_KEY: &str = "console-key-0123456789";

struct Bot {
    users: Arc<InMemoryUserRepository>,
    requests: Arc<InMemoryRequestRepository>,
    events: Arc<InMemoryEventLog>,
    sessions: Arc<InMemorySessionStore>,
    messenger: Arc<RecordingMessenger>,
    app: Router,
    next_update_id: std::sync::atomic::AtomicI64,
}

impl Bot {
    fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let requests = Arc::new(InMemoryRequestRepository::new());
        let events = Arc::new(InMemoryEventLog::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let messenger = Arc::new(RecordingMessenger::new());
        let notifier = Arc::new(StaffNotifier::new(
            messenger.clone(),
            vec![TelegramId::new(STAFF_CHAT)],
        ));

        let dispatcher = Arc::new(Dispatcher::new(
            users.clone(),
            requests.clone(),
            events.clone(),
            Arc::new(StaticContentReader::new(vec![])),
            sessions.clone(),
            messenger.clone(),
            notifier,
        ));

        let console = ConsoleHandlers::new(
            Arc::new(ListRequestsHandler::new(requests.clone())),
            Arc::new(GetRequestHandler::new(requests.clone())),
            Arc::new(UpdateRequestStatusHandler::new(requests.clone())),
            Arc::new(ReplyToRequestHandler::new(requests.clone(), messenger.clone())),
        );

        let app = Router::new()
            .merge(webhook_routes(WebhookState::new(
                dispatcher,
                Some(SecretString::new(WEBHOOK_SECRET.to_string())),
            )))
            .merge(console_routes(
                console,
                SecretString::new(CONSOLE_KEY.to_string()),
            ));

        Self {
            users,
            requests,
            events,
            sessions,
            messenger,
            app,
            next_update_id: std::sync::atomic::AtomicI64::new(1),
        }
    }

    async fn post_update(&self, message: Value) -> StatusCode {
        let update_id = self
            .next_update_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let body = json!({ "update_id": update_id, "message": message });
        let request = Request::builder()
            .method("POST")
            .uri("/telegram/webhook")
            .header("content-type", "application/json")
            .header(SECRET_HEADER, WEBHOOK_SECRET)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap().status()
    }

    async fn text(&self, text: &str) {
        let status = self
            .post_update(json!({
                "message_id": 1,
                "chat": { "id": GUEST, "type": "private" },
                "from": { "id": GUEST, "is_bot": false, "first_name": "Ivan", "username": "ivan" },
                "text": text,
            }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn press(&self, button: QuickReply) {
        self.text(button.label()).await;
    }

    async fn share_phone(&self, phone: &str, owner: i64) {
        let status = self
            .post_update(json!({
                "message_id": 1,
                "chat": { "id": GUEST, "type": "private" },
                "from": { "id": GUEST, "is_bot": false, "first_name": "Ivan", "username": "ivan" },
                "contact": { "phone_number": phone, "user_id": owner },
            }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn last_text(&self, chat: i64) -> String {
        self.messenger
            .last_to(TelegramId::new(chat))
            .await
            .expect("a message was sent")
            .text
    }

    async fn register(&self) {
        self.text("/start").await;
        self.press(QuickReply::AgeConfirm).await;
        self.press(QuickReply::ConsentAccept).await;
        self.share_phone("+79001234567", GUEST).await;
    }

    async fn console(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-api-key", CONSOLE_KEY)
            .header("content-type", "application/json");
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn registration_through_webhook_activates_user() {
    let bot = Bot::new();

    bot.register().await;

    let user = bot.users.get(TelegramId::new(GUEST)).await.unwrap();
    assert_eq!(user.status, UserStatus::Active);
    assert_eq!(user.phone.as_deref(), Some("+79001234567"));
    assert!(user.consent.is_some());

    let reply = bot.messenger.last_to(TelegramId::new(GUEST)).await.unwrap();
    assert_eq!(reply.keyboard, Keyboard::MainMenu);
    assert_eq!(bot.sessions.load(TelegramId::new(GUEST)).await.unwrap(), None);

    let events = bot.events.event_types(TelegramId::new(GUEST)).await;
    assert_eq!(events[0], "bot_start");
    assert!(events.contains(&"age_confirmed"));
    assert!(events.contains(&"consent_accepted"));
}

#[tokio::test]
async fn someone_elses_contact_does_not_register() {
    let bot = Bot::new();
    bot.text("/start").await;
    bot.press(QuickReply::AgeConfirm).await;
    bot.press(QuickReply::ConsentAccept).await;

    bot.share_phone("+79990000000", 4242).await;

    let user = bot.users.get(TelegramId::new(GUEST)).await.unwrap();
    assert_ne!(user.status, UserStatus::Active);
    assert_eq!(user.phone, None);
    assert_eq!(bot.last_text(GUEST).await, texts::PHONE_NOT_OWN);
}

#[tokio::test]
async fn underage_user_is_refused_afterwards() {
    let bot = Bot::new();
    bot.text("/start").await;
    bot.press(QuickReply::AgeDeny).await;

    assert_eq!(bot.last_text(GUEST).await, texts::AGE_REJECTED);

    bot.press(QuickReply::OrderTransfer).await;
    assert_eq!(bot.last_text(GUEST).await, texts::ACCESS_DENIED);
    assert!(bot.requests.all().await.is_empty());
}

// =============================================================================
// Webhook authentication
// =============================================================================

#[tokio::test]
async fn webhook_without_secret_is_rejected_and_ignored() {
    let bot = Bot::new();
    let body = json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "chat": { "id": GUEST, "type": "private" },
            "from": { "id": GUEST, "is_bot": false },
            "text": "/start",
        }
    });
    let request = Request::builder()
        .method("POST")
        .uri("/telegram/webhook")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = bot.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(bot.users.get(TelegramId::new(GUEST)).await.is_none());
}

// =============================================================================
// Request intake and staff handling
// =============================================================================

#[tokio::test]
async fn transfer_request_reaches_staff_and_reply_reaches_guest() {
    let bot = Bot::new();
    bot.register().await;

    bot.press(QuickReply::OrderTransfer).await;
    bot.text("Lenina street 10").await;
    bot.text("tomorrow").await;
    bot.text("19:30").await;
    bot.text("4").await;
    bot.press(QuickReply::SkipComment).await;
    bot.press(QuickReply::ConfirmSend).await;

    // Stored exactly once with the guest's snapshot
    let stored = bot.requests.all().await;
    assert_eq!(stored.len(), 1);
    let request = &stored[0];
    assert_eq!(request.kind, RequestKind::Transfer);
    assert_eq!(request.status, RequestStatus::New);
    assert_eq!(request.payload.user_info().phone, "+79001234567");
    assert_eq!(request.payload.user_info().username, "@ivan");

    assert!(bot
        .last_text(GUEST)
        .await
        .contains(&format!("Request #{} sent!", request.id)));
    let staff = bot.last_text(STAFF_CHAT).await;
    assert!(staff.contains(&format!("New request #{}", request.id)));
    assert!(staff.contains("Lenina street 10"));
    assert!(bot
        .events
        .event_types(TelegramId::new(GUEST))
        .await
        .contains(&"transfer_request_submitted"));

    // Staff pick it up, then answer
    let id = request.id.value();
    let (status, body) = bot
        .console(
            "PATCH",
            &format!("/api/requests/{}/status", id),
            Some(json!({ "status": "in_progress" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");

    let (status, body) = bot
        .console(
            "POST",
            &format!("/api/requests/{}/reply", id),
            Some(json!({ "reply": "Car arrives at 19:25", "staff_name": "Olga" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivered"], true);
    assert_eq!(body["request"]["status"], "done");

    let relayed = bot.last_text(GUEST).await;
    assert!(relayed.contains(&format!("Reply to your request #{}", id)));
    assert!(relayed.contains("Car arrives at 19:25"));
}

#[tokio::test]
async fn manager_request_is_listed_in_console() {
    let bot = Bot::new();
    bot.register().await;

    bot.press(QuickReply::ContactManager).await;
    bot.text("Please book a table for Friday").await;
    bot.press(QuickReply::ConfirmSend).await;

    let (status, body) = bot
        .console("GET", "/api/requests?kind=manager&status=new", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["kind"], "manager");
    assert_eq!(
        body["items"][0]["data"]["message"],
        "Please book a table for Friday"
    );
}

#[tokio::test]
async fn cancelled_transfer_writes_nothing() {
    let bot = Bot::new();
    bot.register().await;

    bot.press(QuickReply::OrderTransfer).await;
    bot.text("Lenina street 10").await;
    bot.press(QuickReply::Cancel).await;

    assert!(bot.requests.all().await.is_empty());
    assert_eq!(bot.last_text(GUEST).await, texts::CANCELLED);
    assert!(bot.messenger.sent_to(TelegramId::new(STAFF_CHAT)).await.is_empty());
}
